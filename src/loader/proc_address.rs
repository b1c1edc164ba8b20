//! Extension address resolution through the library's own resolver.
//!
//! OpenAL exports `alGetProcAddress`, which some platforms use as the only
//! way to reach extension entry points. Once the tool library is loaded the
//! resolver symbol is located by name and then called for each function the
//! tables ask for.

use std::ffi::{c_char, c_void, CString};

use crate::error::BridgeError;
use crate::table::ProcAddress;

use super::native::NativeLibrary;

/// Names under which the tool library exports its resolver, in lookup order.
pub const TOOL_GET_PROC_ADDRESS_NAMES: [&str; 1] = ["alGetProcAddress"];

/// Native signature of `alGetProcAddress`.
pub type ToolGetProcAddressFn = unsafe extern "C" fn(*const c_char) -> *mut c_void;

/// Resolve `function` by calling the resolver found at `handle`.
///
/// A zero handle or an empty name is a contract violation. A zero result is
/// not an error: it means the function is not present.
pub fn tool_get_proc_address(handle: ProcAddress, function: &str) -> Result<ProcAddress, BridgeError> {
    let ProcAddress::Present(resolver) = handle else {
        return Err(BridgeError::invalid_argument(
            "Passed null pointer for method \"alGetProcAddress\"",
        ));
    };
    let name = checked_function_name(function)?;

    // SAFETY: `resolver` was resolved from a tool-library export listed in
    // TOOL_GET_PROC_ADDRESS_NAMES, whose signature is ToolGetProcAddressFn.
    let resolve: ToolGetProcAddressFn =
        unsafe { std::mem::transmute::<usize, ToolGetProcAddressFn>(resolver.get()) };
    // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
    let address = unsafe { resolve(name.as_ptr()) };

    Ok(ProcAddress::from_ptr(address))
}

/// Validate and convert a function name for native lookup.
pub(crate) fn checked_function_name(function: &str) -> Result<CString, BridgeError> {
    if function.is_empty() {
        return Err(BridgeError::invalid_argument(
            "Function name must not be empty",
        ));
    }
    CString::new(function).map_err(|_| {
        BridgeError::invalid_argument(format!(
            "Function name {:?} contains an interior NUL byte",
            function
        ))
    })
}

/// The tool library's self-describing resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolProcResolver {
    symbol: &'static str,
    handle: ProcAddress,
}

impl ToolProcResolver {
    /// Find the first exported resolver among `names`.
    pub fn locate(library: &dyn NativeLibrary, names: &[&'static str]) -> Option<Self> {
        names.iter().find_map(|&symbol| {
            let handle = library.lookup(symbol);
            handle.is_present().then_some(Self { symbol, handle })
        })
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn handle(&self) -> ProcAddress {
        self.handle
    }

    pub fn resolve(&self, function: &str) -> Result<ProcAddress, BridgeError> {
        tool_get_proc_address(self.handle, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_al_get_proc_address, FakeLibrary};

    fn fake_resolver_handle() -> ProcAddress {
        ProcAddress::from_raw(fake_al_get_proc_address as ToolGetProcAddressFn as usize)
    }

    #[test]
    fn test_zero_handle_is_invalid_argument() {
        let err = tool_get_proc_address(ProcAddress::Absent, "alGenEffects").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
        assert!(err.to_string().contains("alGetProcAddress"));
    }

    #[test]
    fn test_empty_name_is_invalid_argument() {
        let err = tool_get_proc_address(fake_resolver_handle(), "").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
    }

    #[test]
    fn test_interior_nul_is_invalid_argument() {
        let err = tool_get_proc_address(fake_resolver_handle(), "al\0Gen").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
    }

    #[test]
    fn test_resolves_extension_through_resolver() {
        let address = tool_get_proc_address(fake_resolver_handle(), "alGenEffects").unwrap();
        assert!(address.is_present());
    }

    #[test]
    fn test_unknown_function_resolves_to_absent() {
        let address =
            tool_get_proc_address(fake_resolver_handle(), "alFunctionThatNeverExisted").unwrap();
        assert_eq!(address, ProcAddress::Absent);
    }

    #[test]
    fn test_locate_finds_exported_resolver() {
        let library = FakeLibrary::openal_soft("libopenal.so.1");
        let resolver = ToolProcResolver::locate(&library, &TOOL_GET_PROC_ADDRESS_NAMES).unwrap();
        assert_eq!(resolver.symbol(), "alGetProcAddress");
        assert!(resolver.resolve("alGenEffects").unwrap().is_present());
    }

    #[test]
    fn test_locate_without_resolver_export() {
        let library = FakeLibrary::new("libopenal.so.1");
        assert!(ToolProcResolver::locate(&library, &TOOL_GET_PROC_ADDRESS_NAMES).is_none());
    }
}
