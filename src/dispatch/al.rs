//! AL state queries.

use std::ffi::{c_char, CString};
use std::sync::Arc;

use crate::constants::*;
use crate::error::BridgeError;
use crate::table::ProcAddressTable;

use super::call;
use super::strings::{c_string_bytes, decode_ascii, encode_ascii};

type AlGetStringFn = unsafe extern "C" fn(ALenum) -> *const c_char;
type AlIsExtensionPresentFn = unsafe extern "C" fn(*const c_char) -> ALboolean;
type AlGetEnumValueFn = unsafe extern "C" fn(*const c_char) -> ALenum;
type AlGetErrorFn = unsafe extern "C" fn() -> ALenum;

/// AL calls through the AL proc address table
///
/// AL calls act on the current context, so most of these need
/// `alcMakeContextCurrent` to have succeeded first.
#[derive(Debug, Clone)]
pub struct Al {
    table: Arc<ProcAddressTable>,
}

impl Al {
    pub fn new(table: Arc<ProcAddressTable>) -> Self {
        Self { table }
    }

    pub fn get_string(&self, param: ALenum) -> Result<Option<String>, BridgeError> {
        // SAFETY: AlGetStringFn is the alGetString signature; the library owns the result.
        let ptr = unsafe { call::<AlGetStringFn, _>(&self.table, "alGetString", |f| f(param))? };
        Ok(unsafe { c_string_bytes(ptr) }.map(decode_ascii))
    }

    pub fn is_extension_present(&self, name: &str) -> Result<bool, BridgeError> {
        let name = symbol_name(name)?;
        // SAFETY: AlIsExtensionPresentFn is the alIsExtensionPresent signature.
        let present = unsafe {
            call::<AlIsExtensionPresentFn, _>(&self.table, "alIsExtensionPresent", |f| {
                f(name.as_ptr())
            })?
        };
        Ok(present != AL_FALSE)
    }

    /// Value of an AL enum by name, 0 if unknown to the library.
    pub fn get_enum_value(&self, name: &str) -> Result<ALenum, BridgeError> {
        let name = symbol_name(name)?;
        // SAFETY: AlGetEnumValueFn is the alGetEnumValue signature.
        unsafe { call::<AlGetEnumValueFn, _>(&self.table, "alGetEnumValue", |f| f(name.as_ptr())) }
    }

    pub fn get_error(&self) -> Result<ALenum, BridgeError> {
        // SAFETY: AlGetErrorFn is the alGetError signature.
        unsafe { call::<AlGetErrorFn, _>(&self.table, "alGetError", |f| f()) }
    }
}

fn symbol_name(name: &str) -> Result<CString, BridgeError> {
    if name.is_empty() {
        return Err(BridgeError::invalid_argument("Name must not be empty"));
    }
    encode_ascii(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::loader::{AlBundleInfo, DynamicLibraryBundle, Platform};
    use crate::table::FunctionGroup;
    use crate::testing::{FakeLibrary, FakeOpener, FAKE_AL_VERSION};

    fn al() -> Al {
        let config = LibraryConfig {
            prefer_system: true,
            ..LibraryConfig::default()
        };
        let bundle = DynamicLibraryBundle::load(
            Arc::new(AlBundleInfo::new(&config, Platform::Linux)),
            Arc::new(
                FakeOpener::new()
                    .with_library(FakeLibrary::openal_soft("libopenal.so.1"))
                    .with_library(FakeLibrary::new("openal_bridge")),
            ),
        );
        let table = ProcAddressTable::new(FunctionGroup::Al);
        table.reset(&bundle).unwrap();
        Al::new(Arc::new(table))
    }

    #[test]
    fn test_get_string() {
        let al = al();
        assert_eq!(al.get_string(AL_VERSION).unwrap().as_deref(), Some(FAKE_AL_VERSION));
        assert_eq!(al.get_string(0x1234).unwrap(), None);
    }

    #[test]
    fn test_extension_and_enum_queries() {
        let al = al();
        assert!(al.is_extension_present("AL_EXT_FLOAT32").unwrap());
        assert!(!al.is_extension_present("AL_EXT_MCFORMATS").unwrap());
        assert_eq!(al.get_enum_value("AL_RENDERER").unwrap(), AL_RENDERER);
        assert_eq!(al.get_enum_value("AL_NOT_AN_ENUM").unwrap(), 0);
        assert_eq!(al.get_error().unwrap(), AL_NO_ERROR);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            al().get_enum_value(""),
            Err(BridgeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_non_ascii_name_is_encoding_error() {
        assert!(matches!(
            al().is_extension_present("AL_EXT_\u{fc}ber"),
            Err(BridgeError::Encoding { .. })
        ));
    }
}
