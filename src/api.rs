// Public API for flutter_rust_bridge integration
// This module provides FFI functions for the managed runtime to load OpenAL and query it

#![allow(dead_code)] // FFI functions are called from Dart, not detected by Rust analyzer

use std::sync::Arc;

use anyhow::Result;

use crate::context::AudioBindings;
use crate::error::{log_bridge_error, BridgeError};
use crate::loader::{default_bundle_dir, CandidatePolicy, Platform};
use crate::version::AlVersion;

// Re-export error code constants for FFI exposure
pub use crate::error::BridgeErrorCodes;

/// Loaded library summary returned by `initialize_bindings`
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BindingsInfo {
    /// Candidate name the OpenAL library was loaded under
    pub tool_library: String,
    /// Glue libraries that loaded
    pub glue_libraries: Vec<String>,
    /// Per-group entry point availability
    pub groups: Vec<FunctionGroupInfo>,
}

/// Entry point availability of one function group
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionGroupInfo {
    /// "AL", "ALC" or "ALExt"
    pub name: String,
    pub available: u32,
    pub total: u32,
}

/// OpenAL implementation version
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AlVersionInfo {
    pub vendor: String,
    pub renderer: String,
    /// AL version, e.g. "1.1.0"
    pub version: String,
    /// Vendor version, "0.0.0" if the library reports none
    pub vendor_version: String,
}

impl From<&AudioBindings> for BindingsInfo {
    fn from(bindings: &AudioBindings) -> Self {
        let bundle = bindings.bundle();
        Self {
            tool_library: bundle.tool_library_name().unwrap_or_default().to_string(),
            glue_libraries: bundle
                .glue_library_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            groups: bindings
                .availability()
                .into_iter()
                .map(|group| FunctionGroupInfo {
                    name: group.group.name().to_string(),
                    available: group.available as u32,
                    total: group.total as u32,
                })
                .collect(),
        }
    }
}

impl From<AlVersion> for AlVersionInfo {
    fn from(version: AlVersion) -> Self {
        Self {
            vendor: version.vendor,
            renderer: version.renderer,
            version: version.version.to_string(),
            vendor_version: version.vendor_version.to_string(),
        }
    }
}

/// Process bindings, loading OpenAL on first use
fn bindings(context: &str) -> Result<Arc<AudioBindings>, BridgeError> {
    crate::init::initialize().map_err(|err| {
        log_bridge_error(&err, context);
        err
    })
}

/// Get the version of the bridge
///
/// # Returns
///
/// * `Result<String>` - Version string
#[flutter_rust_bridge::frb(sync)]
pub fn get_version() -> Result<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

/// Load OpenAL and resolve every entry point table
///
/// Safe to call repeatedly; the library is loaded once per process and a
/// failed load is reported again on every call.
///
/// # Returns
/// * `Ok(BindingsInfo)` - Loaded library and availability summary
/// * `Err(BridgeError)` - ToolLibraryMissing, GlueLibraryMissing or TableInitFailed
#[flutter_rust_bridge::frb]
pub fn initialize_bindings() -> Result<BindingsInfo, BridgeError> {
    let bindings = bindings("initialize_bindings")?;
    Ok(BindingsInfo::from(bindings.as_ref()))
}

/// Library candidates for this platform in load order
///
/// # Arguments
/// * `prefer_system` - Try the system OpenAL before the bundled one
#[flutter_rust_bridge::frb(sync)]
pub fn library_candidates(prefer_system: bool) -> Vec<String> {
    CandidatePolicy::new(Platform::current(), prefer_system, default_bundle_dir()).tool_library_names()
}

/// Whether an OpenAL entry point resolved to a non-zero address
#[flutter_rust_bridge::frb(sync)]
pub fn is_function_available(name: String) -> Result<bool, BridgeError> {
    Ok(bindings("is_function_available")?.is_function_available(&name))
}

/// Playback device names (`ALC_DEVICE_SPECIFIER`)
#[flutter_rust_bridge::frb]
pub fn device_specifiers() -> Result<Vec<String>, BridgeError> {
    bindings("device_specifiers")?.alc().get_device_specifiers()
}

/// Capture device names (`ALC_CAPTURE_DEVICE_SPECIFIER`)
#[flutter_rust_bridge::frb]
pub fn capture_device_specifiers() -> Result<Vec<String>, BridgeError> {
    bindings("capture_device_specifiers")?
        .alc()
        .get_capture_device_specifiers()
}

/// All playback device names (`ALC_ALL_DEVICES_SPECIFIER`)
#[flutter_rust_bridge::frb]
pub fn all_device_specifiers() -> Result<Vec<String>, BridgeError> {
    bindings("all_device_specifiers")?
        .alc()
        .get_all_device_specifiers()
}

/// Single-string `alcGetString` without a device
///
/// # Errors
/// - InvalidArgument for device list parameters; use the `*_device_specifiers` calls
#[flutter_rust_bridge::frb]
pub fn alc_string(param: i32) -> Result<Option<String>, BridgeError> {
    bindings("alc_string")?.alc().get_string(None, param)
}

/// Vendor, renderer and version of the default device
#[flutter_rust_bridge::frb]
pub fn al_version() -> Result<AlVersionInfo, BridgeError> {
    let bindings = bindings("al_version")?;
    AlVersion::probe(&bindings)
        .map(AlVersionInfo::from)
        .map_err(|err| {
            log_bridge_error(&err, "al_version");
            err
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::testing::{FakeLibrary, FakeOpener};

    #[test]
    fn test_get_version() {
        assert_eq!(get_version().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_library_candidates_end_with_generic_names() {
        let candidates = library_candidates(true);
        assert_eq!(&candidates[candidates.len() - 2..], &["openal", "OpenAL"]);
        assert_eq!(candidates[0], Platform::current().system_library_names()[0]);
    }

    #[test]
    fn test_bindings_info() {
        let config = LibraryConfig {
            prefer_system: true,
            ..LibraryConfig::default()
        };
        let opener = Arc::new(
            FakeOpener::new()
                .with_library(FakeLibrary::openal_soft("libopenal.so.1"))
                .with_library(FakeLibrary::new("openal_bridge")),
        );
        let bindings = AudioBindings::load(&config, Platform::Linux, opener).unwrap();
        let info = BindingsInfo::from(&bindings);

        assert_eq!(info.tool_library, "libopenal.so.1");
        assert_eq!(info.glue_libraries, vec!["openal_bridge"]);
        let names: Vec<_> = info.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["AL", "ALC", "ALExt"]);

        let version = AlVersionInfo::from(AlVersion::probe(&bindings).unwrap());
        assert_eq!(version.version, "1.1.0");
        assert_eq!(version.vendor_version, "1.23.1");
    }
}
