//! Library candidate resolution.
//!
//! Produces the ordered list of OpenAL library names to try for a platform
//! and a system-vs-bundled preference, plus the glue libraries that must all
//! be present. Nothing here touches the filesystem; an empty result simply
//! means "no library available" to the loader.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base name of this crate's own cdylib, which serves as the glue library.
pub const GLUE_LIBRARY_NAME: &str = "openal_bridge";

/// Generic names tried last, resolved through the platform search path.
pub const GENERIC_FALLBACK_NAMES: [&str; 2] = ["openal", "OpenAL"];

/// Base names of the bundled OpenAL Soft build.
const BUNDLED_BASE_NAMES: [&str; 2] = ["openal", "OpenAL"];

/// Host platform identity used to pick library file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Android,
    MacOs,
    Windows,
    /// Any other unix-like host
    Other,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(target_os = "android")] {
                Platform::Android
            } else if #[cfg(target_os = "linux")] {
                Platform::Linux
            } else if #[cfg(target_os = "macos")] {
                Platform::MacOs
            } else if #[cfg(windows)] {
                Platform::Windows
            } else {
                Platform::Other
            }
        }
    }

    /// Platform-conventional file name for a library base name.
    pub fn library_filename(self, base: &str) -> String {
        match self {
            Platform::Windows => format!("{base}.dll"),
            Platform::MacOs => format!("lib{base}.dylib"),
            Platform::Linux | Platform::Android | Platform::Other => format!("lib{base}.so"),
        }
    }

    /// Names under which the platform conventionally installs OpenAL.
    pub fn system_library_names(self) -> &'static [&'static str] {
        match self {
            Platform::Linux => &["libopenal.so.1"],
            Platform::Android => &["libopenal.so"],
            Platform::MacOs => &["/System/Library/Frameworks/OpenAL.framework/OpenAL"],
            Platform::Windows => &["OpenAL32.dll"],
            Platform::Other => &["libopenal.so.1"],
        }
    }

    /// Alternate system names tried after the conventional ones.
    pub fn alternate_system_names(self) -> &'static [&'static str] {
        match self {
            Platform::Linux => &["libOpenAL.so.1", "libopenal.so", "libOpenAL.so"],
            Platform::Android => &["libOpenAL.so"],
            Platform::MacOs => &["libopenal.1.dylib", "libopenal.dylib"],
            Platform::Windows => &["soft_oal.dll"],
            Platform::Other => &["libopenal.so"],
        }
    }
}

/// Inputs of the candidate resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePolicy {
    pub platform: Platform,
    pub prefer_system: bool,
    /// Where bundled libraries live; no bundled candidates when `None`
    pub bundle_dir: Option<PathBuf>,
}

impl CandidatePolicy {
    pub fn new(platform: Platform, prefer_system: bool, bundle_dir: Option<PathBuf>) -> Self {
        Self {
            platform,
            prefer_system,
            bundle_dir,
        }
    }

    /// All system names, conventional first.
    pub fn system_names(&self) -> Vec<String> {
        self.platform
            .system_library_names()
            .iter()
            .chain(self.platform.alternate_system_names())
            .map(|name| name.to_string())
            .collect()
    }

    /// Bundled OpenAL Soft paths inside the bundle directory.
    pub fn bundled_names(&self) -> Vec<String> {
        match &self.bundle_dir {
            Some(dir) => BUNDLED_BASE_NAMES
                .iter()
                .map(|base| bundled_path(dir, &self.platform.library_filename(base)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ordered tool library candidates; first successful load wins.
    pub fn tool_library_names(&self) -> Vec<String> {
        let (first, second) = if self.prefer_system {
            (self.system_names(), self.bundled_names())
        } else {
            (self.bundled_names(), self.system_names())
        };

        first
            .into_iter()
            .chain(second)
            .chain(GENERIC_FALLBACK_NAMES.iter().map(|name| name.to_string()))
            .collect()
    }

    /// Glue libraries, each given as its ordered alternatives.
    ///
    /// Every inner list must yield one loaded library for the binding to be
    /// complete.
    pub fn glue_library_names(&self, glue: &[String]) -> Vec<Vec<String>> {
        glue.iter()
            .map(|base| {
                let mut alternatives = Vec::with_capacity(2);
                if let Some(dir) = &self.bundle_dir {
                    alternatives.push(bundled_path(dir, &self.platform.library_filename(base)));
                }
                alternatives.push(base.clone());
                alternatives
            })
            .collect()
    }
}

/// Directory of the running executable, used as the default bundle dir.
pub fn default_bundle_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

fn bundled_path(dir: &Path, file_name: &str) -> String {
    dir.join(file_name).to_string_lossy().into_owned()
}
