//! Native library loading: candidate names, the platform loader seam, the
//! loaded bundle and the tool library's own address resolver.

pub mod bundle;
pub mod candidates;
pub mod native;
pub mod proc_address;

pub use bundle::{AlBundleInfo, DynamicLibraryBundle, LibraryBundleInfo};
pub use candidates::{
    default_bundle_dir, CandidatePolicy, Platform, GENERIC_FALLBACK_NAMES, GLUE_LIBRARY_NAME,
};
pub use native::{LibraryOpener, NativeLibrary, SystemLibraryOpener};
pub use proc_address::{
    tool_get_proc_address, ToolGetProcAddressFn, ToolProcResolver, TOOL_GET_PROC_ADDRESS_NAMES,
};
