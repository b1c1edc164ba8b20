//! Test doubles for the native loader.
//!
//! [`FakeOpener`] stands in for the platform loader and hands out
//! [`FakeLibrary`] instances registered by name. The
//! [`FakeLibrary::openal_soft`] preset exports the entry points from
//! [`fake_al`], which are real `extern "C"` functions, so the whole path from
//! candidate list to native call runs without an OpenAL installation.

pub mod fake_al;

pub use fake_al::{
    fake_al_get_proc_address, fake_last_context_attributes, fake_live_handles, FAKE_ALL_DEVICES,
    FAKE_AL_RENDERER, FAKE_AL_VENDOR, FAKE_AL_VERSION, FAKE_CAPTURE_DEVICES, FAKE_DEVICES, FAKE_EXPORTS,
    FAKE_NON_ASCII_PARAM, FAKE_RESOLVER_ONLY,
};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::BridgeError;
use crate::loader::{LibraryOpener, NativeLibrary};
use crate::table::ProcAddress;

/// In-memory library with a fixed symbol table
#[derive(Debug, Clone, Default)]
pub struct FakeLibrary {
    name: String,
    symbols: HashMap<String, ProcAddress>,
}

impl FakeLibrary {
    /// Library with no exports.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbols: HashMap::new(),
        }
    }

    /// Library exporting the fake OpenAL Soft entry points.
    pub fn openal_soft(name: &str) -> Self {
        FAKE_EXPORTS.iter().fold(Self::new(name), |library, symbol| {
            let address = fake_al::fake_export_address(symbol).unwrap_or_default();
            library.with_symbol(symbol, address)
        })
    }

    pub fn with_symbol(mut self, symbol: &str, address: usize) -> Self {
        self.symbols
            .insert(symbol.to_string(), ProcAddress::from_raw(address));
        self
    }

    pub fn without_symbol(mut self, symbol: &str) -> Self {
        self.symbols.remove(symbol);
        self
    }
}

impl NativeLibrary for FakeLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, symbol: &str) -> ProcAddress {
        self.symbols.get(symbol).copied().unwrap_or_default()
    }
}

/// Loader double that records every open attempt
#[derive(Debug, Default)]
pub struct FakeOpener {
    libraries: HashMap<String, FakeLibrary>,
    global_symbols: HashMap<String, ProcAddress>,
    attempts: Mutex<Vec<(String, bool)>>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `library` loadable under its own name.
    pub fn with_library(mut self, library: FakeLibrary) -> Self {
        self.libraries.insert(library.name.clone(), library);
        self
    }

    /// Symbol visible to process-wide lookups only.
    pub fn with_global_symbol(mut self, symbol: &str, address: usize) -> Self {
        self.global_symbols
            .insert(symbol.to_string(), ProcAddress::from_raw(address));
        self
    }

    /// Names passed to `open`, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.recorded().into_iter().map(|(name, _)| name).collect()
    }

    /// Visibility requested on the first attempt to open `name`.
    pub fn global_flag(&self, name: &str) -> Option<bool> {
        self.recorded()
            .into_iter()
            .find(|(attempted, _)| attempted == name)
            .map(|(_, global)| global)
    }

    fn recorded(&self) -> Vec<(String, bool)> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LibraryOpener for FakeOpener {
    fn open(&self, name: &str, global: bool) -> Result<Arc<dyn NativeLibrary>, BridgeError> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), global));

        match self.libraries.get(name) {
            Some(library) => Ok(Arc::new(library.clone())),
            None => Err(BridgeError::LibraryOpenFailed {
                name: name.to_string(),
                reason: "not registered with FakeOpener".to_string(),
            }),
        }
    }

    fn lookup_global(&self, symbol: &str) -> ProcAddress {
        self.global_symbols.get(symbol).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openal_soft_preset_exports() {
        let library = FakeLibrary::openal_soft("libopenal.so.1");
        assert!(library.lookup("alGetProcAddress").is_present());
        assert!(library.lookup("alcGetString").is_present());
        assert!(!library.lookup("alGenEffects").is_present());
    }

    #[test]
    fn test_opener_records_attempts() {
        let opener = FakeOpener::new().with_library(FakeLibrary::new("openal"));
        assert!(opener.open("libopenal.so.1", true).is_err());
        let library = opener.open("openal", false).unwrap();

        assert_eq!(library.name(), "openal");
        assert_eq!(opener.attempts(), vec!["libopenal.so.1", "openal"]);
        assert_eq!(opener.global_flag("libopenal.so.1"), Some(true));
        assert_eq!(opener.global_flag("openal"), Some(false));
        assert_eq!(opener.global_flag("OpenAL"), None);
    }
}
