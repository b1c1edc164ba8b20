//! ALC entry points: strings, device enumeration, extensions, device and
//! context lifecycle.

use std::ffi::{c_char, c_void, CString};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::constants::*;
use crate::error::BridgeError;
use crate::table::ProcAddressTable;

use super::call;
use super::strings::{
    c_string_bytes, decode_ascii, double_null_terminated_bytes, encode_ascii,
    split_double_null_terminated,
};

type AlcGetStringFn = unsafe extern "C" fn(*mut c_void, ALCenum) -> *const c_char;
type AlcIsExtensionPresentFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> ALCboolean;
type AlcGetErrorFn = unsafe extern "C" fn(*mut c_void) -> ALCenum;
type AlcOpenDeviceFn = unsafe extern "C" fn(*const c_char) -> *mut c_void;
type AlcCloseDeviceFn = unsafe extern "C" fn(*mut c_void) -> ALCboolean;
type AlcCreateContextFn = unsafe extern "C" fn(*mut c_void, *const ALCint) -> *mut c_void;
type AlcMakeContextCurrentFn = unsafe extern "C" fn(*mut c_void) -> ALCboolean;
type AlcDestroyContextFn = unsafe extern "C" fn(*mut c_void);

/// Opaque `ALCdevice*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(NonZeroUsize);

/// Opaque `ALCcontext*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(NonZeroUsize);

impl DeviceHandle {
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }
}

impl ContextHandle {
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }
}

fn device_ptr(device: Option<DeviceHandle>) -> *mut c_void {
    device.map_or(std::ptr::null_mut(), DeviceHandle::as_ptr)
}

/// True iff `alcGetString(device, param)` returns a device list.
pub fn is_double_null_terminated_string(device: Option<DeviceHandle>, param: ALCenum) -> bool {
    device.is_none() && ALC_DEVICE_LIST_PARAMS.contains(&param)
}

/// Copy of `list` ending in a zero key.
///
/// Attribute lists are (key, value) pairs, so an even-length list gets a
/// zero key appended and an odd-length list must already end in one.
fn terminated_attributes(list: &[ALCint]) -> Result<Vec<ALCint>, BridgeError> {
    if list.len() % 2 == 1 && list.last() != Some(&0) {
        return Err(BridgeError::invalid_argument(format!(
            "ALC attribute key {:#x} has no value",
            list[list.len() - 1]
        )));
    }
    let mut terminated = list.to_vec();
    if list.len() % 2 == 0 {
        terminated.push(0);
    }
    Ok(terminated)
}

fn c_name(name: &str) -> Result<CString, BridgeError> {
    CString::new(name).map_err(|_| {
        BridgeError::invalid_argument(format!("{:?} contains an interior NUL byte", name))
    })
}

/// ALC calls through the ALC proc address table
#[derive(Debug, Clone)]
pub struct Alc {
    table: Arc<ProcAddressTable>,
}

impl Alc {
    pub fn new(table: Arc<ProcAddressTable>) -> Self {
        Self { table }
    }

    /// Single-string `alcGetString`. `None` when the library returns null.
    ///
    /// Device list queries are rejected; use
    /// [`get_string_as_double_null_terminated_string`](Self::get_string_as_double_null_terminated_string).
    pub fn get_string(
        &self,
        device: Option<DeviceHandle>,
        param: ALCenum,
    ) -> Result<Option<String>, BridgeError> {
        if is_double_null_terminated_string(device, param) {
            return Err(BridgeError::invalid_argument(format!(
                "ALC parameter {:#x} without a device returns a device list; \
                 use get_string_as_double_null_terminated_string",
                param
            )));
        }

        // SAFETY: AlcGetStringFn is the alcGetString signature; the returned
        // string is owned by the library and copied before returning.
        let ptr = unsafe {
            call::<AlcGetStringFn, _>(&self.table, "alcGetString", |f| f(device_ptr(device), param))?
        };
        Ok(unsafe { c_string_bytes(ptr) }.map(decode_ascii))
    }

    /// Multi-string `alcGetString` for device list queries.
    pub fn get_string_as_double_null_terminated_string(
        &self,
        device: Option<DeviceHandle>,
        param: ALCenum,
    ) -> Result<Vec<String>, BridgeError> {
        if !is_double_null_terminated_string(device, param) {
            return Err(BridgeError::invalid_argument(format!(
                "ALC parameter {:#x} returns a single string; use get_string",
                param
            )));
        }

        // SAFETY: see get_string; device lists are double-null-terminated.
        let ptr = unsafe {
            call::<AlcGetStringFn, _>(&self.table, "alcGetString", |f| f(device_ptr(device), param))?
        };
        Ok(unsafe { double_null_terminated_bytes(ptr) }
            .map(split_double_null_terminated)
            .unwrap_or_default())
    }

    pub fn get_device_specifiers(&self) -> Result<Vec<String>, BridgeError> {
        self.get_string_as_double_null_terminated_string(None, ALC_DEVICE_SPECIFIER)
    }

    pub fn get_capture_device_specifiers(&self) -> Result<Vec<String>, BridgeError> {
        self.get_string_as_double_null_terminated_string(None, ALC_CAPTURE_DEVICE_SPECIFIER)
    }

    pub fn get_all_device_specifiers(&self) -> Result<Vec<String>, BridgeError> {
        self.get_string_as_double_null_terminated_string(None, ALC_ALL_DEVICES_SPECIFIER)
    }

    pub fn is_extension_present(
        &self,
        device: Option<DeviceHandle>,
        name: &str,
    ) -> Result<bool, BridgeError> {
        let name = encode_ascii(name)?;
        // SAFETY: AlcIsExtensionPresentFn is the alcIsExtensionPresent signature.
        let present = unsafe {
            call::<AlcIsExtensionPresentFn, _>(&self.table, "alcIsExtensionPresent", |f| {
                f(device_ptr(device), name.as_ptr())
            })?
        };
        Ok(present != ALC_FALSE)
    }

    pub fn enumeration_ext_is_present(&self) -> Result<bool, BridgeError> {
        self.is_extension_present(None, ALC_ENUMERATION_EXT)
    }

    pub fn enumerate_all_ext_is_present(&self) -> Result<bool, BridgeError> {
        self.is_extension_present(None, ALC_ENUMERATE_ALL_EXT)
    }

    pub fn get_error(&self, device: Option<DeviceHandle>) -> Result<ALCenum, BridgeError> {
        // SAFETY: AlcGetErrorFn is the alcGetError signature.
        unsafe { call::<AlcGetErrorFn, _>(&self.table, "alcGetError", |f| f(device_ptr(device))) }
    }

    /// Open `name`, or the default device when `None`.
    pub fn open_device(&self, name: Option<&str>) -> Result<Option<DeviceHandle>, BridgeError> {
        let name = name.map(c_name).transpose()?;
        let name_ptr = name.as_ref().map_or(std::ptr::null(), |name| name.as_ptr());
        // SAFETY: AlcOpenDeviceFn is the alcOpenDevice signature; null selects the default device.
        let device = unsafe {
            call::<AlcOpenDeviceFn, _>(&self.table, "alcOpenDevice", |f| f(name_ptr))?
        };
        Ok(DeviceHandle::from_ptr(device))
    }

    pub fn close_device(&self, device: DeviceHandle) -> Result<bool, BridgeError> {
        // SAFETY: AlcCloseDeviceFn is the alcCloseDevice signature.
        let closed = unsafe {
            call::<AlcCloseDeviceFn, _>(&self.table, "alcCloseDevice", |f| f(device.as_ptr()))?
        };
        Ok(closed != ALC_FALSE)
    }

    /// Create a context from (key, value) attribute pairs.
    ///
    /// The pairs may omit the terminating zero key; a key without a value is
    /// an `InvalidArgument`.
    pub fn create_context(
        &self,
        device: DeviceHandle,
        attributes: Option<&[ALCint]>,
    ) -> Result<Option<ContextHandle>, BridgeError> {
        let attributes = attributes.map(terminated_attributes).transpose()?;
        let attributes_ptr = attributes.as_ref().map_or(std::ptr::null(), |list| list.as_ptr());
        // SAFETY: AlcCreateContextFn is the alcCreateContext signature; the
        // attribute list is zero-terminated and outlives the call.
        let context = unsafe {
            call::<AlcCreateContextFn, _>(&self.table, "alcCreateContext", |f| {
                f(device.as_ptr(), attributes_ptr)
            })?
        };
        Ok(ContextHandle::from_ptr(context))
    }

    /// Make `context` current; `None` releases the current context.
    pub fn make_context_current(&self, context: Option<ContextHandle>) -> Result<bool, BridgeError> {
        let context_ptr = context.map_or(std::ptr::null_mut(), ContextHandle::as_ptr);
        // SAFETY: AlcMakeContextCurrentFn is the alcMakeContextCurrent signature.
        let made_current = unsafe {
            call::<AlcMakeContextCurrentFn, _>(&self.table, "alcMakeContextCurrent", |f| {
                f(context_ptr)
            })?
        };
        Ok(made_current != ALC_FALSE)
    }

    pub fn destroy_context(&self, context: ContextHandle) -> Result<(), BridgeError> {
        // SAFETY: AlcDestroyContextFn is the alcDestroyContext signature.
        unsafe {
            call::<AlcDestroyContextFn, _>(&self.table, "alcDestroyContext", |f| {
                f(context.as_ptr())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::loader::{AlBundleInfo, DynamicLibraryBundle, Platform};
    use crate::table::FunctionGroup;
    use crate::testing::{
        fake_last_context_attributes, FakeLibrary, FakeOpener, FAKE_NON_ASCII_PARAM,
    };

    fn alc_with(library: FakeLibrary) -> Alc {
        let config = LibraryConfig {
            prefer_system: true,
            bundle_dir: None,
            ..LibraryConfig::default()
        };
        let bundle = DynamicLibraryBundle::load(
            Arc::new(AlBundleInfo::new(&config, Platform::Linux)),
            Arc::new(
                FakeOpener::new()
                    .with_library(library)
                    .with_library(FakeLibrary::new("openal_bridge")),
            ),
        );
        let table = ProcAddressTable::new(FunctionGroup::Alc);
        table.reset(&bundle).unwrap();
        Alc::new(Arc::new(table))
    }

    fn alc() -> Alc {
        alc_with(FakeLibrary::openal_soft("libopenal.so.1"))
    }

    #[test]
    fn test_double_null_terminated_params() {
        assert!(is_double_null_terminated_string(None, ALC_DEVICE_SPECIFIER));
        assert!(is_double_null_terminated_string(None, ALC_CAPTURE_DEVICE_SPECIFIER));
        assert!(is_double_null_terminated_string(None, ALC_ALL_DEVICES_SPECIFIER));
        assert!(!is_double_null_terminated_string(None, ALC_DEFAULT_DEVICE_SPECIFIER));
        assert!(!is_double_null_terminated_string(None, ALC_EXTENSIONS));

        let device = DeviceHandle::from_ptr(0x10 as *mut c_void);
        assert!(!is_double_null_terminated_string(device, ALC_DEVICE_SPECIFIER));
    }

    #[test]
    fn test_device_specifiers() {
        let alc = alc();
        assert_eq!(alc.get_device_specifiers().unwrap(), vec!["alsa", "pulse"]);
        assert_eq!(alc.get_all_device_specifiers().unwrap(), vec!["alsa", "pulse", "hdmi"]);
        assert_eq!(alc.get_capture_device_specifiers().unwrap(), vec!["mic"]);
    }

    #[test]
    fn test_single_string_path_rejects_device_list() {
        let err = alc().get_string(None, ALC_DEVICE_SPECIFIER).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
        assert!(err
            .to_string()
            .contains("get_string_as_double_null_terminated_string"));
    }

    #[test]
    fn test_multi_string_path_rejects_single_string_params() {
        let err = alc()
            .get_string_as_double_null_terminated_string(None, ALC_EXTENSIONS)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
    }

    #[test]
    fn test_single_strings() {
        let alc = alc();
        assert_eq!(
            alc.get_string(None, ALC_DEFAULT_DEVICE_SPECIFIER).unwrap().as_deref(),
            Some("alsa")
        );
        assert_eq!(alc.get_string(None, 0x7F7F).unwrap(), None);

        let device = alc.open_device(None).unwrap().unwrap();
        assert_eq!(
            alc.get_string(Some(device), ALC_DEVICE_SPECIFIER).unwrap().as_deref(),
            Some("alsa")
        );
        assert!(alc.close_device(device).unwrap());
    }

    #[test]
    fn test_non_ascii_result_is_replaced() {
        assert_eq!(
            alc().get_string(None, FAKE_NON_ASCII_PARAM).unwrap().as_deref(),
            Some("caf\u{FFFD}\u{FFFD}")
        );
    }

    #[test]
    fn test_non_ascii_extension_name_is_encoding_error() {
        assert!(matches!(
            alc().is_extension_present(None, "ALC_EXT_caf\u{e9}"),
            Err(BridgeError::Encoding { .. })
        ));
    }

    #[test]
    fn test_extension_presence() {
        let alc = alc();
        assert!(alc.enumeration_ext_is_present().unwrap());
        assert!(alc.enumerate_all_ext_is_present().unwrap());
        assert!(!alc.is_extension_present(None, "ALC_SOFT_loopback").unwrap());
        assert!(matches!(
            alc.is_extension_present(None, "ALC\0EXT"),
            Err(BridgeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_device_and_context_lifecycle() {
        let alc = alc();
        assert!(alc.open_device(Some("nonexistent")).unwrap().is_none());

        let device = alc.open_device(Some("pulse")).unwrap().unwrap();
        let context = alc
            .create_context(device, Some(&[0x1007, 44100]))
            .unwrap()
            .unwrap();
        assert!(alc.make_context_current(Some(context)).unwrap());
        assert_eq!(alc.get_error(Some(device)).unwrap(), ALC_NO_ERROR);
        assert!(alc.make_context_current(None).unwrap());
        alc.destroy_context(context).unwrap();
        assert!(alc.close_device(device).unwrap());
    }

    #[test]
    fn test_terminated_attributes() {
        assert_eq!(terminated_attributes(&[]).unwrap(), vec![0]);
        assert_eq!(terminated_attributes(&[0x1007, 44100]).unwrap(), vec![0x1007, 44100, 0]);
        // a zero value in the last pair is not a terminator
        assert_eq!(terminated_attributes(&[0x1009, 0]).unwrap(), vec![0x1009, 0, 0]);
        assert_eq!(terminated_attributes(&[0x1009, 0, 0]).unwrap(), vec![0x1009, 0, 0]);
        assert!(matches!(
            terminated_attributes(&[0x1007, 44100, 0x1009]),
            Err(BridgeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_create_context_passes_terminated_pairs() {
        let alc = alc();
        let device = alc.open_device(None).unwrap().unwrap();

        let context = alc.create_context(device, Some(&[0x1009, 0])).unwrap().unwrap();
        assert_eq!(fake_last_context_attributes(), Some(vec![0x1009, 0, 0]));
        alc.destroy_context(context).unwrap();

        alc.create_context(device, None).unwrap().unwrap();
        assert_eq!(fake_last_context_attributes(), None);

        assert!(matches!(
            alc.create_context(device, Some(&[0x1009])),
            Err(BridgeError::InvalidArgument { .. })
        ));
        assert!(alc.close_device(device).unwrap());
    }

    #[test]
    fn test_missing_entry_point_is_unsupported() {
        let alc = alc_with(FakeLibrary::openal_soft("libopenal.so.1").without_symbol("alcGetString"));
        // alcGetString is still reachable through alGetProcAddress
        assert!(alc.get_device_specifiers().is_ok());

        let alc = alc_with(
            FakeLibrary::openal_soft("libopenal.so.1")
                .without_symbol("alGetProcAddress")
                .without_symbol("alcGetError"),
        );
        assert_eq!(
            alc.get_error(None).unwrap_err(),
            BridgeError::unsupported("alcGetError")
        );
    }
}
