//! Proc address tables
//!
//! One table per [`FunctionGroup`] maps every known function name to the
//! address the loaded bundle resolved for it. A table only changes through
//! [`ProcAddressTable::reset`], which resolves the complete symbol set into a
//! fresh map and then swaps it in under the write lock, so readers see the
//! whole table either before or after a reset.

mod address;
mod groups;

pub use address::{NativeFn, ProcAddress, ResolvedAddress};
pub use groups::FunctionGroup;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{BridgeError, ErrorCode};
use crate::loader::DynamicLibraryBundle;

type Entries = HashMap<&'static str, ProcAddress>;

/// Name to address registry for one function group
#[derive(Debug)]
pub struct ProcAddressTable {
    group: FunctionGroup,
    entries: RwLock<Arc<Entries>>,
}

impl ProcAddressTable {
    /// Create a table with every entry absent.
    pub fn new(group: FunctionGroup) -> Self {
        let entries = group
            .function_names()
            .iter()
            .map(|&name| (name, ProcAddress::Absent))
            .collect();
        Self {
            group,
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    pub fn group(&self) -> FunctionGroup {
        self.group
    }

    /// Resolve every function of this group against `bundle`.
    ///
    /// Returns the number of functions that resolved. On error the previous
    /// contents stay in place.
    pub fn reset(&self, bundle: &DynamicLibraryBundle) -> Result<usize, BridgeError> {
        if !bundle.is_tool_lib_loaded() {
            return Err(BridgeError::TableInitFailed {
                group: self.group.name().to_string(),
                reason: "no tool library loaded".to_string(),
            });
        }

        let mut resolved = Entries::with_capacity(self.group.function_names().len());
        for &name in self.group.function_names() {
            let address = bundle
                .dynamic_lookup_function(name)
                .map_err(|err| BridgeError::TableInitFailed {
                    group: self.group.name().to_string(),
                    reason: err.message(),
                })?;
            resolved.insert(name, address);
        }
        let available = resolved.values().filter(|address| address.is_present()).count();

        let mut entries = self.entries.write().map_err(|_| BridgeError::LockPoisoned {
            component: format!("{} proc address table", self.group),
        })?;
        *entries = Arc::new(resolved);
        drop(entries);

        log::debug!(
            "[Table] {} reset: {}/{} functions available",
            self.group,
            available,
            self.group.function_names().len()
        );
        Ok(available)
    }

    /// Current contents. The snapshot does not follow later resets.
    pub fn snapshot(&self) -> Arc<HashMap<&'static str, ProcAddress>> {
        // The lock only guards an Arc swap, so a poisoned guard still holds a complete map.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&entries)
    }

    /// Address for `name`; absent for unknown names and before the first reset.
    pub fn lookup(&self, name: &str) -> ProcAddress {
        self.snapshot().get(name).copied().unwrap_or_default()
    }

    /// Numeric address for `name`, 0 when unavailable.
    pub fn address_of(&self, name: &str) -> usize {
        self.lookup(name).as_raw()
    }

    /// Entry for `name`, `None` if this group does not know the name.
    pub fn resolved(&self, name: &str) -> Option<ResolvedAddress> {
        self.snapshot()
            .get_key_value(name)
            .map(|(symbol, address)| ResolvedAddress::new(*symbol, *address))
    }

    /// Typed entry point for `name`.
    ///
    /// Unknown names fail with `UnsupportedOperation`; known but absent names
    /// produce a [`NativeFn`] whose `get` fails the same way.
    ///
    /// # Safety
    /// `F` must be the native signature of `name`.
    pub unsafe fn function<F: Copy>(&self, name: &str) -> Result<NativeFn<F>, BridgeError> {
        match self.snapshot().get_key_value(name) {
            Some((symbol, address)) => Ok(NativeFn::new(*symbol, *address)),
            None => Err(BridgeError::unsupported(name)),
        }
    }

    /// Names with a non-zero address, sorted.
    pub fn available_functions(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .snapshot()
            .iter()
            .filter(|(_, address)| address.is_present())
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.group.function_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::loader::{AlBundleInfo, Platform};
    use crate::testing::{FakeLibrary, FakeOpener};
    use std::path::PathBuf;

    fn bundle(opener: FakeOpener) -> DynamicLibraryBundle {
        let config = LibraryConfig {
            prefer_system: true,
            bundle_dir: Some(PathBuf::from("/opt/natives")),
            ..LibraryConfig::default()
        };
        DynamicLibraryBundle::load(
            Arc::new(AlBundleInfo::new(&config, Platform::Linux)),
            Arc::new(opener),
        )
    }

    fn loaded_bundle() -> DynamicLibraryBundle {
        bundle(
            FakeOpener::new()
                .with_library(FakeLibrary::openal_soft("libopenal.so.1"))
                .with_library(FakeLibrary::new("openal_bridge")),
        )
    }

    #[test]
    fn test_every_address_zero_before_reset() {
        for group in FunctionGroup::ALL {
            let table = ProcAddressTable::new(group);
            for name in group.function_names() {
                assert_eq!(table.address_of(name), 0);
            }
            assert!(table.available_functions().is_empty());
        }
    }

    #[test]
    fn test_reset_resolves_known_functions() {
        let bundle = loaded_bundle();
        let table = ProcAddressTable::new(FunctionGroup::Alc);
        let available = table.reset(&bundle).unwrap();

        assert!(available > 0);
        assert_ne!(table.address_of("alcGetString"), 0);
        assert_eq!(table.address_of("alcCaptureSamples"), 0);
        assert_eq!(table.available_functions().len(), available);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let bundle = loaded_bundle();
        let table = ProcAddressTable::new(FunctionGroup::AlExt);
        table.reset(&bundle).unwrap();
        let first = table.snapshot();
        table.reset(&bundle).unwrap();
        assert_eq!(*first, *table.snapshot());
        assert_ne!(table.address_of("alGenEffects"), 0);
        assert_eq!(table.address_of("alBufferCallbackSOFT"), 0);
    }

    #[test]
    fn test_reset_without_tool_library_keeps_contents() {
        let table = ProcAddressTable::new(FunctionGroup::Al);
        table.reset(&loaded_bundle()).unwrap();
        let before = table.snapshot();

        let empty = bundle(FakeOpener::new());
        let err = table.reset(&empty).unwrap_err();
        assert!(matches!(err, BridgeError::TableInitFailed { ref group, .. } if group == "AL"));
        assert_eq!(*before, *table.snapshot());
    }

    #[test]
    fn test_unknown_name_is_zero_and_unsupported() {
        let table = ProcAddressTable::new(FunctionGroup::Al);
        table.reset(&loaded_bundle()).unwrap();

        assert_eq!(table.address_of("alcGetString"), 0);
        assert!(table.resolved("alcGetString").is_none());
        let err = unsafe { table.function::<unsafe extern "C" fn()>("alNotAFunction") }.unwrap_err();
        assert_eq!(err, BridgeError::unsupported("alNotAFunction"));
    }

    #[test]
    fn test_resolved_entry_carries_symbol() {
        let table = ProcAddressTable::new(FunctionGroup::Al);
        table.reset(&loaded_bundle()).unwrap();

        let entry = table.resolved("alGetString").unwrap();
        assert_eq!(entry.symbol, "alGetString");
        assert!(entry.is_available());
        let absent = table.resolved("alSourcePlayv").unwrap();
        assert!(!absent.is_available());
    }
}
