// AudioBindings: caller-owned OpenAL binding context
// Owns the loaded library bundle and the three proc address tables

use std::sync::Arc;

use serde::Serialize;

use crate::config::LibraryConfig;
use crate::dispatch::{Al, Alc, ContextHandle};
use crate::error::{log_bridge_error, BridgeError};
use crate::loader::{AlBundleInfo, DynamicLibraryBundle, LibraryOpener, Platform};
use crate::table::{FunctionGroup, ProcAddressTable};

/// Availability summary of one proc address table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupAvailability {
    pub group: FunctionGroup,
    pub available: usize,
    pub total: usize,
}

/// AudioBindings: loaded OpenAL plus its resolved entry points
///
/// Built once per process by [`crate::init::initialize`], or directly with a
/// fake opener in tests:
/// - Dynamic library bundle (tool library, glue libraries, tool resolver)
/// - AL, ALC and extension proc address tables
///
/// Construction fails fast when the tool library or a glue library is
/// missing; there is no degraded mode.
pub struct AudioBindings {
    bundle: Arc<DynamicLibraryBundle>,
    al: Arc<ProcAddressTable>,
    alc: Arc<ProcAddressTable>,
    al_ext: Arc<ProcAddressTable>,
}

impl AudioBindings {
    /// Load OpenAL for `platform` and resolve every table
    ///
    /// # Arguments
    /// * `config` - Library resolution policy
    /// * `platform` - Host platform identity
    /// * `opener` - Platform loader (system or fake)
    ///
    /// # Errors
    /// - `ToolLibraryMissing` if no candidate loads
    /// - `GlueLibraryMissing` if a glue library is absent
    /// - `TableInitFailed` if a table cannot be populated
    pub fn load(
        config: &LibraryConfig,
        platform: Platform,
        opener: Arc<dyn LibraryOpener>,
    ) -> Result<Self, BridgeError> {
        let info = Arc::new(AlBundleInfo::new(config, platform));
        Self::from_bundle(DynamicLibraryBundle::load(info, opener))
    }

    /// Check a loaded bundle and resolve every table against it
    pub fn from_bundle(bundle: DynamicLibraryBundle) -> Result<Self, BridgeError> {
        if !bundle.is_tool_lib_loaded() {
            let err = BridgeError::ToolLibraryMissing {
                attempted: bundle.attempted_tool_libraries().to_vec(),
            };
            log_bridge_error(&err, "AudioBindings::load");
            return Err(err);
        }
        if !bundle.is_lib_complete() {
            let err = BridgeError::GlueLibraryMissing {
                missing: bundle.missing_glue_libraries().to_vec(),
            };
            log_bridge_error(&err, "AudioBindings::load");
            return Err(err);
        }

        let bindings = Self {
            bundle: Arc::new(bundle),
            al: Arc::new(ProcAddressTable::new(FunctionGroup::Al)),
            alc: Arc::new(ProcAddressTable::new(FunctionGroup::Alc)),
            al_ext: Arc::new(ProcAddressTable::new(FunctionGroup::AlExt)),
        };
        for group in FunctionGroup::ALL {
            bindings.reset_table(group).map_err(|err| {
                log_bridge_error(&err, "AudioBindings::load");
                err
            })?;
        }

        log::info!(
            "[AudioBindings] OpenAL loaded from {}",
            bindings.bundle.tool_library_name().unwrap_or("<unknown>")
        );
        Ok(bindings)
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    pub fn al(&self) -> Al {
        Al::new(Arc::clone(&self.al))
    }

    pub fn alc(&self) -> Alc {
        Alc::new(Arc::clone(&self.alc))
    }

    /// Make `context` current and re-probe extension entry points
    ///
    /// Extension availability may depend on the device behind the current
    /// context, so the extension table is rebuilt after a successful switch.
    pub fn make_context_current(&self, context: Option<ContextHandle>) -> Result<bool, BridgeError> {
        let made_current = self.alc().make_context_current(context)?;
        if made_current && context.is_some() {
            self.reset_extension_tables()?;
        }
        Ok(made_current)
    }

    // ========================================================================
    // TABLES
    // ========================================================================

    pub fn table(&self, group: FunctionGroup) -> &ProcAddressTable {
        match group {
            FunctionGroup::Al => self.al.as_ref(),
            FunctionGroup::Alc => self.alc.as_ref(),
            FunctionGroup::AlExt => self.al_ext.as_ref(),
        }
    }

    /// Rebuild one table from the loaded bundle
    pub fn reset_table(&self, group: FunctionGroup) -> Result<usize, BridgeError> {
        self.table(group).reset(&self.bundle)
    }

    pub fn reset_extension_tables(&self) -> Result<(), BridgeError> {
        self.reset_table(FunctionGroup::AlExt).map(|_| ())
    }

    /// True iff `name` has a non-zero address in any table
    pub fn is_function_available(&self, name: &str) -> bool {
        FunctionGroup::ALL
            .iter()
            .any(|&group| self.table(group).lookup(name).is_present())
    }

    pub fn availability(&self) -> Vec<GroupAvailability> {
        FunctionGroup::ALL
            .iter()
            .map(|&group| {
                let table = self.table(group);
                GroupAvailability {
                    group,
                    available: table.available_functions().len(),
                    total: table.len(),
                }
            })
            .collect()
    }

    pub fn bundle(&self) -> &DynamicLibraryBundle {
        &self.bundle
    }
}

impl std::fmt::Debug for AudioBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBindings")
            .field("bundle", &self.bundle)
            .field("availability", &self.availability())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLibrary, FakeOpener};

    fn config() -> LibraryConfig {
        LibraryConfig {
            prefer_system: true,
            bundle_dir: None,
            ..LibraryConfig::default()
        }
    }

    fn complete_opener() -> Arc<FakeOpener> {
        Arc::new(
            FakeOpener::new()
                .with_library(FakeLibrary::openal_soft("libopenal.so.1"))
                .with_library(FakeLibrary::new("openal_bridge")),
        )
    }

    #[test]
    fn test_load_resolves_all_tables() {
        let bindings = AudioBindings::load(&config(), Platform::Linux, complete_opener()).unwrap();

        assert_eq!(bindings.bundle().tool_library_name(), Some("libopenal.so.1"));
        assert!(bindings.is_function_available("alGetString"));
        assert!(bindings.is_function_available("alcOpenDevice"));
        assert!(bindings.is_function_available("alGenEffects"));
        assert!(!bindings.is_function_available("alBufferCallbackSOFT"));
        assert!(!bindings.is_function_available("notAnOpenALFunction"));

        let availability = bindings.availability();
        assert_eq!(availability.len(), 3);
        assert!(availability.iter().all(|group| group.available > 0));
    }

    #[test]
    fn test_missing_tool_library_is_fatal() {
        let opener = Arc::new(FakeOpener::new().with_library(FakeLibrary::new("openal_bridge")));
        let err = AudioBindings::load(&config(), Platform::Linux, opener).unwrap_err();
        match err {
            BridgeError::ToolLibraryMissing { ref attempted } => {
                assert_eq!(attempted.first().map(String::as_str), Some("libopenal.so.1"));
                assert_eq!(attempted.last().map(String::as_str), Some("OpenAL"));
            }
            ref other => panic!("Expected ToolLibraryMissing, got {:?}", other),
        }
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_glue_library_is_fatal() {
        let opener =
            Arc::new(FakeOpener::new().with_library(FakeLibrary::openal_soft("libopenal.so.1")));
        let err = AudioBindings::load(&config(), Platform::Linux, opener).unwrap_err();
        assert_eq!(
            err,
            BridgeError::GlueLibraryMissing {
                missing: vec!["openal_bridge".to_string()]
            }
        );
    }

    #[test]
    fn test_make_context_current_rebuilds_extension_table() {
        let bindings = AudioBindings::load(&config(), Platform::Linux, complete_opener()).unwrap();
        let before = bindings.table(FunctionGroup::AlExt).snapshot();

        let alc = bindings.alc();
        let device = alc.open_device(None).unwrap().unwrap();
        let context = alc.create_context(device, None).unwrap().unwrap();
        assert!(bindings.make_context_current(Some(context)).unwrap());

        let after = bindings.table(FunctionGroup::AlExt).snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);

        assert!(bindings.make_context_current(None).unwrap());
        alc.destroy_context(context).unwrap();
        alc.close_device(device).unwrap();
    }
}
