//! Dynamic library bundle: the loaded tool library plus its glue libraries.
//!
//! The bundle walks the tool candidates in order and keeps the first one that
//! loads, requires every glue library, and then answers symbol lookups using
//! the tool's own resolver and the library symbol table in the order the
//! [`LibraryBundleInfo`] policy dictates. It never unloads anything; the
//! handles live as long as the bundle, which in practice is the process.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::LibraryConfig;
use crate::error::BridgeError;
use crate::table::ProcAddress;

use super::candidates::{default_bundle_dir, CandidatePolicy, Platform};
use super::native::{LibraryOpener, NativeLibrary};
use super::proc_address::{checked_function_name, ToolProcResolver, TOOL_GET_PROC_ADDRESS_NAMES};

/// Describes which libraries make up a bundle and how lookups are routed.
pub trait LibraryBundleInfo: Send + Sync {
    /// Tool library candidates in priority order.
    fn tool_library_names(&self) -> Vec<String>;

    /// Required glue libraries, each with ordered alternatives.
    fn glue_library_names(&self) -> Vec<Vec<String>>;

    /// Names of the tool's own proc address resolver.
    fn tool_get_proc_address_names(&self) -> &[&'static str];

    /// Whether `function` is resolved through the tool resolver first.
    fn use_tool_get_proc_address_first(&self, function: &str) -> bool;

    /// Load the tool library with global symbol visibility.
    fn shall_link_global(&self) -> bool;

    /// Fall back to a process-wide lookup when the tool lookups miss.
    fn shall_lookup_global(&self) -> bool;
}

/// OpenAL bundle description derived from [`LibraryConfig`].
#[derive(Debug, Clone)]
pub struct AlBundleInfo {
    policy: CandidatePolicy,
    glue_libraries: Vec<String>,
    use_tool_first: bool,
    link_global: bool,
    lookup_global: bool,
}

impl AlBundleInfo {
    pub fn new(config: &LibraryConfig, platform: Platform) -> Self {
        let bundle_dir: Option<PathBuf> = config.bundle_dir.clone().or_else(default_bundle_dir);
        Self {
            policy: CandidatePolicy::new(platform, config.prefer_system, bundle_dir),
            glue_libraries: config.glue_libraries.clone(),
            use_tool_first: config.use_tool_get_proc_address_first,
            link_global: config.link_global,
            lookup_global: config.lookup_global,
        }
    }

    pub fn policy(&self) -> &CandidatePolicy {
        &self.policy
    }
}

impl LibraryBundleInfo for AlBundleInfo {
    fn tool_library_names(&self) -> Vec<String> {
        self.policy.tool_library_names()
    }

    fn glue_library_names(&self) -> Vec<Vec<String>> {
        self.policy.glue_library_names(&self.glue_libraries)
    }

    fn tool_get_proc_address_names(&self) -> &[&'static str] {
        &TOOL_GET_PROC_ADDRESS_NAMES
    }

    fn use_tool_get_proc_address_first(&self, _function: &str) -> bool {
        self.use_tool_first
    }

    fn shall_link_global(&self) -> bool {
        self.link_global
    }

    fn shall_lookup_global(&self) -> bool {
        self.lookup_global
    }
}

/// Loaded tool library, glue libraries and the tool resolver.
pub struct DynamicLibraryBundle {
    info: Arc<dyn LibraryBundleInfo>,
    opener: Arc<dyn LibraryOpener>,
    tool_library: Option<Arc<dyn NativeLibrary>>,
    attempted: Vec<String>,
    glue_libraries: Vec<Arc<dyn NativeLibrary>>,
    missing_glue: Vec<String>,
    tool_resolver: Option<ToolProcResolver>,
}

impl DynamicLibraryBundle {
    /// Load the tool library and every glue library.
    ///
    /// Never fails by itself; callers check [`is_tool_lib_loaded`] and
    /// [`is_lib_complete`] and decide.
    ///
    /// [`is_tool_lib_loaded`]: Self::is_tool_lib_loaded
    /// [`is_lib_complete`]: Self::is_lib_complete
    pub fn load(info: Arc<dyn LibraryBundleInfo>, opener: Arc<dyn LibraryOpener>) -> Self {
        let (tool_library, attempted) = load_tool_library(info.as_ref(), opener.as_ref());
        let (glue_libraries, missing_glue) = load_glue_libraries(info.as_ref(), opener.as_ref());

        let tool_resolver = tool_library.as_ref().and_then(|library| {
            let resolver =
                ToolProcResolver::locate(library.as_ref(), info.tool_get_proc_address_names());
            if resolver.is_none() {
                log::warn!(
                    "[Loader] {} exports none of {:?}; extensions resolve through the symbol table only",
                    library.name(),
                    info.tool_get_proc_address_names()
                );
            }
            resolver
        });

        Self {
            info,
            opener,
            tool_library,
            attempted,
            glue_libraries,
            missing_glue,
            tool_resolver,
        }
    }

    /// True iff a tool library candidate loaded.
    pub fn is_tool_lib_loaded(&self) -> bool {
        self.tool_library.is_some()
    }

    /// True iff the tool library and every glue library loaded.
    pub fn is_lib_complete(&self) -> bool {
        self.is_tool_lib_loaded() && self.missing_glue.is_empty()
    }

    /// Candidate name the tool library was loaded under.
    pub fn tool_library_name(&self) -> Option<&str> {
        self.tool_library.as_ref().map(|library| library.name())
    }

    /// Tool candidates tried, in order, up to and including the loaded one.
    pub fn attempted_tool_libraries(&self) -> &[String] {
        &self.attempted
    }

    pub fn glue_library_names(&self) -> Vec<&str> {
        self.glue_libraries.iter().map(|library| library.name()).collect()
    }

    /// Glue libraries none of whose alternatives loaded.
    pub fn missing_glue_libraries(&self) -> &[String] {
        &self.missing_glue
    }

    pub fn tool_resolver(&self) -> Option<&ToolProcResolver> {
        self.tool_resolver.as_ref()
    }

    /// Resolve `function` to an address.
    ///
    /// An absent result is valid; an empty name is rejected.
    pub fn dynamic_lookup_function(&self, function: &str) -> Result<ProcAddress, BridgeError> {
        checked_function_name(function)?;
        let Some(library) = &self.tool_library else {
            return Ok(ProcAddress::Absent);
        };

        let address = if self.info.use_tool_get_proc_address_first(function) {
            self.resolve_with_tool(function)?
                .or_else(|| Ok(library.lookup(function)))?
        } else {
            library
                .lookup(function)
                .or_else(|| self.resolve_with_tool(function))?
        };

        if !address.is_present() && self.info.shall_lookup_global() {
            return Ok(self.opener.lookup_global(function));
        }
        Ok(address)
    }

    /// True iff `function` resolves to a non-zero address.
    pub fn is_function_available(&self, function: &str) -> bool {
        self.dynamic_lookup_function(function)
            .map(ProcAddress::is_present)
            .unwrap_or(false)
    }

    fn resolve_with_tool(&self, function: &str) -> Result<ProcAddress, BridgeError> {
        match &self.tool_resolver {
            Some(resolver) => resolver.resolve(function),
            None => Ok(ProcAddress::Absent),
        }
    }
}

impl std::fmt::Debug for DynamicLibraryBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLibraryBundle")
            .field("tool_library", &self.tool_library_name())
            .field("glue_libraries", &self.glue_library_names())
            .field("missing_glue", &self.missing_glue)
            .field("tool_resolver", &self.tool_resolver)
            .finish()
    }
}

fn load_tool_library(
    info: &dyn LibraryBundleInfo,
    opener: &dyn LibraryOpener,
) -> (Option<Arc<dyn NativeLibrary>>, Vec<String>) {
    let global = info.shall_link_global();
    let mut attempted = Vec::new();

    for candidate in info.tool_library_names() {
        attempted.push(candidate.clone());
        match opener.open(&candidate, global) {
            Ok(library) => {
                tracing::info!(library = %candidate, global, "[Loader] Loaded OpenAL tool library");
                return (Some(library), attempted);
            }
            Err(err) => {
                tracing::debug!(library = %candidate, error = %err, "[Loader] Tool candidate failed");
            }
        }
    }

    log::error!("[Loader] No OpenAL tool library could be loaded ({} candidates)", attempted.len());
    (None, attempted)
}

fn load_glue_libraries(
    info: &dyn LibraryBundleInfo,
    opener: &dyn LibraryOpener,
) -> (Vec<Arc<dyn NativeLibrary>>, Vec<String>) {
    let mut loaded = Vec::new();
    let mut missing = Vec::new();

    for alternatives in info.glue_library_names() {
        let library = alternatives.iter().find_map(|name| match opener.open(name, false) {
            Ok(library) => Some(library),
            Err(err) => {
                tracing::debug!(library = %name, error = %err, "[Loader] Glue candidate failed");
                None
            }
        });

        match library {
            Some(library) => {
                tracing::info!(library = library.name(), "[Loader] Loaded glue library");
                loaded.push(library);
            }
            None => {
                let name = alternatives.last().cloned().unwrap_or_default();
                log::error!("[Loader] Glue library {} could not be loaded", name);
                missing.push(name);
            }
        }
    }

    (loaded, missing)
}
