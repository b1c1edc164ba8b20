//! Native library seams.
//!
//! [`LibraryOpener`] and [`NativeLibrary`] isolate the platform loader so the
//! bundle logic can run against a fake in tests. [`SystemLibraryOpener`] is
//! the real implementation on top of `libloading`.

use std::ffi::{c_void, OsString};
use std::path::Path;
use std::sync::Arc;

use crate::error::BridgeError;
use crate::table::ProcAddress;

/// A loaded shared library that can resolve symbols by name.
pub trait NativeLibrary: Send + Sync {
    /// Candidate name the library was opened under.
    fn name(&self) -> &str;

    /// Address of an exported symbol, absent if not exported.
    fn lookup(&self, symbol: &str) -> ProcAddress;
}

/// Opens libraries by candidate name.
pub trait LibraryOpener: Send + Sync {
    /// Load `name`. `global` requests global symbol visibility for later
    /// lookups; symbols are always bound lazily.
    fn open(&self, name: &str, global: bool) -> Result<Arc<dyn NativeLibrary>, BridgeError>;

    /// Process-wide lookup across every globally visible image.
    fn lookup_global(&self, symbol: &str) -> ProcAddress;
}

/// `libloading`-backed opener for the host platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLibraryOpener;

impl SystemLibraryOpener {
    pub fn new() -> Self {
        Self
    }
}

struct SystemLibrary {
    name: String,
    library: libloading::Library,
}

impl NativeLibrary for SystemLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, symbol: &str) -> ProcAddress {
        // SAFETY: the symbol is read as an opaque address, never dereferenced here.
        match unsafe { self.library.get::<*mut c_void>(symbol.as_bytes()) } {
            Ok(address) => ProcAddress::from_ptr(*address),
            Err(_) => ProcAddress::Absent,
        }
    }
}

impl LibraryOpener for SystemLibraryOpener {
    fn open(&self, name: &str, global: bool) -> Result<Arc<dyn NativeLibrary>, BridgeError> {
        let file_name = native_file_name(name);
        let library = open_library(&file_name, global).map_err(|err| {
            BridgeError::LibraryOpenFailed {
                name: name.to_string(),
                reason: err.to_string(),
            }
        })?;

        Ok(Arc::new(SystemLibrary {
            name: name.to_string(),
            library,
        }))
    }

    fn lookup_global(&self, symbol: &str) -> ProcAddress {
        lookup_process_symbol(symbol)
    }
}

/// Expand a bare base name ("openal") into the platform file name.
///
/// Names that already carry a path or an extension are used verbatim.
fn native_file_name(name: &str) -> OsString {
    let path = Path::new(name);
    let is_bare = path.components().count() == 1 && path.extension().is_none();
    if is_bare {
        libloading::library_filename(name)
    } else {
        OsString::from(name)
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn open_library(file_name: &OsString, global: bool) -> Result<libloading::Library, libloading::Error> {
            use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_LAZY, RTLD_LOCAL};

            let visibility = if global { RTLD_GLOBAL } else { RTLD_LOCAL };
            // SAFETY: loading runs the library's initializers; OpenAL and the
            // glue library have no initialization preconditions.
            unsafe { Library::open(Some(file_name), RTLD_LAZY | visibility) }.map(Into::into)
        }

        fn lookup_process_symbol(symbol: &str) -> ProcAddress {
            let this = libloading::os::unix::Library::this();
            // SAFETY: opaque address read only.
            match unsafe { this.get::<*mut c_void>(symbol.as_bytes()) } {
                Ok(address) => ProcAddress::from_ptr(*address),
                Err(_) => ProcAddress::Absent,
            }
        }
    } else if #[cfg(windows)] {
        fn open_library(file_name: &OsString, _global: bool) -> Result<libloading::Library, libloading::Error> {
            // SAFETY: see the unix variant.
            unsafe { libloading::Library::new(file_name) }
        }

        fn lookup_process_symbol(symbol: &str) -> ProcAddress {
            let Ok(this) = libloading::os::windows::Library::this() else {
                return ProcAddress::Absent;
            };
            // SAFETY: opaque address read only.
            match unsafe { this.get::<*mut c_void>(symbol.as_bytes()) } {
                Ok(address) => ProcAddress::from_ptr(*address),
                Err(_) => ProcAddress::Absent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_names_get_platform_filename() {
        assert_eq!(native_file_name("openal"), libloading::library_filename("openal"));
    }

    #[test]
    fn test_qualified_names_are_verbatim() {
        assert_eq!(native_file_name("libopenal.so.1"), OsString::from("libopenal.so.1"));
        assert_eq!(native_file_name("OpenAL32.dll"), OsString::from("OpenAL32.dll"));
        assert_eq!(
            native_file_name("/opt/natives/libopenal.so"),
            OsString::from("/opt/natives/libopenal.so")
        );
    }

    #[test]
    fn test_missing_library_reports_open_failure() {
        let opener = SystemLibraryOpener::new();
        let err = opener
            .open("/nonexistent/dir/libopenal_missing.so", true)
            .err()
            .expect("nonexistent library must not load");
        match err {
            BridgeError::LibraryOpenFailed { name, .. } => {
                assert_eq!(name, "/nonexistent/dir/libopenal_missing.so");
            }
            other => panic!("Expected LibraryOpenFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_global_lookup_of_unknown_symbol_is_absent() {
        let opener = SystemLibraryOpener::new();
        assert_eq!(
            opener.lookup_global("openal_bridge_symbol_that_does_not_exist"),
            ProcAddress::Absent
        );
    }
}
