//! Configuration for library resolution and diagnostics
//!
//! Runtime configuration is loaded from a JSON file and then adjusted from
//! environment variables, so library preference and debug output can be
//! switched per deployment without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the JSON config file
pub const CONFIG_PATH_ENV: &str = "OPENAL_BRIDGE_CONFIG";
/// Prefer the system OpenAL over the bundled one when set
pub const SYSTEM_OPENAL_ENV: &str = "OPENAL_BRIDGE_SYSTEM_OPENAL";
/// Enable debug output for every component when set
pub const DEBUG_ENV: &str = "OPENAL_BRIDGE_DEBUG";
/// Enable verbose output when set
pub const VERBOSE_ENV: &str = "OPENAL_BRIDGE_VERBOSE";

const DEFAULT_CONFIG_FILE: &str = "openal_bridge.json";

/// Complete bridge configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Native library resolution policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Try system-installed OpenAL before the bundled OpenAL Soft
    pub prefer_system: bool,
    /// Directory searched first for bundled libraries (executable dir when unset)
    pub bundle_dir: Option<PathBuf>,
    /// Glue libraries that must all load
    pub glue_libraries: Vec<String>,
    /// Resolve through alGetProcAddress before the library symbol table
    pub use_tool_get_proc_address_first: bool,
    /// Load the tool library with global symbol visibility
    pub link_global: bool,
    /// Fall back to a process-wide symbol lookup
    pub lookup_global: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            prefer_system: false,
            bundle_dir: None,
            glue_libraries: vec![crate::loader::GLUE_LIBRARY_NAME.to_string()],
            use_tool_get_proc_address_first: true,
            link_global: true,
            lookup_global: false,
        }
    }
}

/// Diagnostic output switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    /// Debug output for all components
    pub debug: bool,
    /// Debug output for the named components only (e.g. "Loader", "Table")
    pub debug_components: Vec<String>,
}

impl LoggingConfig {
    /// Whether debug output is enabled for `component`
    pub fn debug_enabled(&self, component: &str) -> bool {
        self.debug
            || self
                .debug_components
                .iter()
                .any(|c| c.eq_ignore_ascii_case(component))
    }

    /// Maximum level handed to the tracing subscriber
    pub fn level_filter(&self) -> tracing::Level {
        if self.debug || !self.debug_components.is_empty() {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl BridgeConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::debug!(
                    "[Config] No config file at {:?} ({}). Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration for the current process
    ///
    /// Reads the file named by `OPENAL_BRIDGE_CONFIG` (or `openal_bridge.json`)
    /// and applies environment overrides.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from_file(path).with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    ///
    /// A variable counts as set unless it is empty, `0` or `false`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|value| is_truthy(&value));

        if let Some(prefer_system) = flag(SYSTEM_OPENAL_ENV) {
            self.library.prefer_system = prefer_system;
        }
        if let Some(debug) = flag(DEBUG_ENV) {
            self.logging.debug = debug;
        }
        if let Some(verbose) = flag(VERBOSE_ENV) {
            self.logging.verbose = verbose;
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(!config.library.prefer_system);
        assert!(config.library.use_tool_get_proc_address_first);
        assert!(config.library.link_global);
        assert!(!config.library.lookup_global);
        assert_eq!(config.library.glue_libraries, vec!["openal_bridge"]);
        assert!(!config.logging.debug);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = BridgeConfig::default();
        config.library.prefer_system = true;
        config.library.bundle_dir = Some(PathBuf::from("/opt/app/natives"));
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let parsed: BridgeConfig =
            serde_json::from_str(r#"{ "library": { "prefer_system": true } }"#).unwrap();
        assert!(parsed.library.prefer_system);
        assert!(parsed.library.use_tool_get_proc_address_first);
        assert_eq!(parsed.library.glue_libraries, vec!["openal_bridge"]);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = BridgeConfig::load_from_file("/nonexistent/openal_bridge.json");
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (SYSTEM_OPENAL_ENV, "1"),
            (DEBUG_ENV, "true"),
            (VERBOSE_ENV, "0"),
        ]
        .into_iter()
        .collect();

        let mut base = BridgeConfig::default();
        base.logging.verbose = true;
        let config = base.with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.library.prefer_system);
        assert!(config.logging.debug);
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_unset_overrides_leave_config_alone() {
        let mut base = BridgeConfig::default();
        base.library.prefer_system = true;
        let config = base.clone().with_overrides(|_| None);
        assert_eq!(config, base);
    }

    #[test]
    fn test_debug_components() {
        let logging = LoggingConfig {
            verbose: false,
            debug: false,
            debug_components: vec!["Loader".to_string()],
        };
        assert!(logging.debug_enabled("loader"));
        assert!(!logging.debug_enabled("Table"));
        assert_eq!(logging.level_filter(), tracing::Level::DEBUG);
        assert_eq!(LoggingConfig::default().level_filter(), tracing::Level::WARN);
    }
}
