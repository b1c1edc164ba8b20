//! Fake OpenAL entry points.
//!
//! Plain `extern "C"` functions with the native signatures, so lookups and
//! dispatch run through real function pointers. The fake behaves like a
//! small OpenAL Soft build with two playback devices, one capture device and
//! EFX reachable only through `alGetProcAddress`.

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_int, c_void, CStr};
use std::ptr;

use crate::constants::*;

/// Devices reported for `ALC_DEVICE_SPECIFIER` without a device
pub const FAKE_DEVICES: [&str; 2] = ["alsa", "pulse"];
/// Devices reported for `ALC_ALL_DEVICES_SPECIFIER` without a device
pub const FAKE_ALL_DEVICES: [&str; 3] = ["alsa", "pulse", "hdmi"];
pub const FAKE_CAPTURE_DEVICES: [&str; 1] = ["mic"];
pub const FAKE_AL_VERSION: &str = "1.1 ALSOFT 1.23.1";
pub const FAKE_AL_VENDOR: &str = "OpenAL Community";
pub const FAKE_AL_RENDERER: &str = "OpenAL Soft";

/// ALC parameter for which the fake answers with non-ASCII bytes
pub const FAKE_NON_ASCII_PARAM: ALCenum = 0x7F01;

/// Symbols exported by the fake library's symbol table
pub const FAKE_EXPORTS: &[&str] = &[
    "alGetProcAddress",
    "alGetString",
    "alGetError",
    "alIsExtensionPresent",
    "alGetEnumValue",
    "alcOpenDevice",
    "alcCloseDevice",
    "alcCreateContext",
    "alcMakeContextCurrent",
    "alcDestroyContext",
    "alcGetError",
    "alcIsExtensionPresent",
    "alcGetString",
];

/// Symbols only reachable through `alGetProcAddress`
pub const FAKE_RESOLVER_ONLY: &[&str] = &[
    "alGenEffects",
    "alDeleteEffects",
    "alIsEffect",
    "alcDevicePauseSOFT",
    "alcDeviceResumeSOFT",
];

static DEVICE_LIST: &[u8] = b"alsa\0pulse\0\0";
static ALL_DEVICE_LIST: &[u8] = b"alsa\0pulse\0hdmi\0\0";
static CAPTURE_DEVICE_LIST: &[u8] = b"mic\0\0";
static DEFAULT_DEVICE: &[u8] = b"alsa\0";
static DEFAULT_CAPTURE_DEVICE: &[u8] = b"mic\0";
static ALC_EXTENSION_STRING: &[u8] =
    b"ALC_ENUMERATION_EXT ALC_ENUMERATE_ALL_EXT ALC_EXT_EFX ALC_SOFT_pause_device\0";
static NON_ASCII: &[u8] = b"caf\xc3\xa9\0";

static AL_VENDOR_STRING: &[u8] = b"OpenAL Community\0";
static AL_VERSION_STRING: &[u8] = b"1.1 ALSOFT 1.23.1\0";
static AL_RENDERER_STRING: &[u8] = b"OpenAL Soft\0";
static AL_EXTENSION_STRING: &[u8] = b"AL_EXT_FLOAT32 AL_SOFT_buffer_samples AL_SOFT_source_latency\0";

static DEVICE: u8 = 0;
static CONTEXT: u8 = 0;

fn device_ptr() -> *mut c_void {
    &DEVICE as *const u8 as *mut c_void
}

fn context_ptr() -> *mut c_void {
    &CONTEXT as *const u8 as *mut c_void
}

fn as_c_str(bytes: &'static [u8]) -> *const c_char {
    bytes.as_ptr() as *const c_char
}

unsafe fn name_arg<'a>(name: *const c_char) -> Option<&'a str> {
    if name.is_null() {
        return None;
    }
    CStr::from_ptr(name).to_str().ok()
}

fn listed(extensions: &'static [u8], name: &str) -> bool {
    let list = extensions.strip_suffix(b"\0").unwrap_or(extensions);
    list.split(|b| *b == b' ')
        .any(|ext| ext.eq_ignore_ascii_case(name.as_bytes()))
}

fn exported(name: &str) -> Option<usize> {
    let address = match name {
        "alGetProcAddress" => fake_al_get_proc_address as usize,
        "alGetString" => fake_al_get_string as usize,
        "alGetError" => fake_al_get_error as usize,
        "alIsExtensionPresent" => fake_al_is_extension_present as usize,
        "alGetEnumValue" => fake_al_get_enum_value as usize,
        "alcOpenDevice" => fake_alc_open_device as usize,
        "alcCloseDevice" => fake_alc_close_device as usize,
        "alcCreateContext" => fake_alc_create_context as usize,
        "alcMakeContextCurrent" => fake_alc_make_context_current as usize,
        "alcDestroyContext" => fake_alc_destroy_context as usize,
        "alcGetError" => fake_alc_get_error as usize,
        "alcIsExtensionPresent" => fake_alc_is_extension_present as usize,
        "alcGetString" => fake_alc_get_string as usize,
        _ => return None,
    };
    Some(address)
}

fn resolver_only(name: &str) -> Option<usize> {
    let address = match name {
        "alGenEffects" => fake_al_gen_effects as usize,
        "alDeleteEffects" => fake_al_delete_effects as usize,
        "alIsEffect" => fake_al_is_effect as usize,
        "alcDevicePauseSOFT" => fake_alc_device_pause_soft as usize,
        "alcDeviceResumeSOFT" => fake_alc_device_pause_soft as usize,
        _ => return None,
    };
    Some(address)
}

/// Address of a symbol in the fake library's export table.
pub fn fake_export_address(name: &str) -> Option<usize> {
    exported(name)
}

/// Fake `alGetProcAddress`: resolves exports and EFX/SOFT extensions.
///
/// # Safety
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn fake_al_get_proc_address(name: *const c_char) -> *mut c_void {
    let Some(name) = name_arg(name) else {
        return ptr::null_mut();
    };
    exported(name)
        .or_else(|| resolver_only(name))
        .map_or(ptr::null_mut(), |address| address as *mut c_void)
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_get_string(device: *mut c_void, param: ALCenum) -> *const c_char {
    let bytes: &'static [u8] = match (device.is_null(), param) {
        (true, ALC_DEVICE_SPECIFIER) => DEVICE_LIST,
        (true, ALC_ALL_DEVICES_SPECIFIER) => ALL_DEVICE_LIST,
        (true, ALC_CAPTURE_DEVICE_SPECIFIER) => CAPTURE_DEVICE_LIST,
        (false, ALC_DEVICE_SPECIFIER) | (false, ALC_ALL_DEVICES_SPECIFIER) => DEFAULT_DEVICE,
        (_, ALC_DEFAULT_DEVICE_SPECIFIER) | (_, ALC_DEFAULT_ALL_DEVICES_SPECIFIER) => DEFAULT_DEVICE,
        (_, ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER) => DEFAULT_CAPTURE_DEVICE,
        (_, ALC_EXTENSIONS) => ALC_EXTENSION_STRING,
        (_, FAKE_NON_ASCII_PARAM) => NON_ASCII,
        _ => return ptr::null(),
    };
    as_c_str(bytes)
}

/// # Safety
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn fake_alc_is_extension_present(
    _device: *mut c_void,
    name: *const c_char,
) -> ALCboolean {
    match name_arg(name) {
        Some(name) if listed(ALC_EXTENSION_STRING, name) => ALC_TRUE,
        _ => ALC_FALSE,
    }
}

/// # Safety
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn fake_alc_open_device(name: *const c_char) -> *mut c_void {
    let known = match name_arg(name) {
        None => name.is_null(),
        Some(name) => FAKE_DEVICES.contains(&name) || FAKE_ALL_DEVICES.contains(&name),
    };
    if !known {
        return ptr::null_mut();
    }
    OPEN_DEVICES.with(|open| open.set(open.get() + 1));
    device_ptr()
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_close_device(device: *mut c_void) -> ALCboolean {
    if device == device_ptr() {
        OPEN_DEVICES.with(|open| open.set(open.get().saturating_sub(1)));
        ALC_TRUE
    } else {
        ALC_FALSE
    }
}

thread_local! {
    static LAST_CONTEXT_ATTRIBUTES: RefCell<Option<Vec<ALCint>>> = const { RefCell::new(None) };
    static OPEN_DEVICES: Cell<usize> = const { Cell::new(0) };
    static LIVE_CONTEXTS: Cell<usize> = const { Cell::new(0) };
}

/// Devices opened and contexts created on this thread that were not yet
/// closed or destroyed.
pub fn fake_live_handles() -> (usize, usize) {
    (
        OPEN_DEVICES.with(Cell::get),
        LIVE_CONTEXTS.with(Cell::get),
    )
}

/// Attribute list the last `fake_alc_create_context` call on this thread
/// received, including its zero key; `None` for a null list.
pub fn fake_last_context_attributes() -> Option<Vec<ALCint>> {
    LAST_CONTEXT_ATTRIBUTES.with(|last| last.borrow().clone())
}

/// Reads (key, value) pairs up to the zero key, like OpenAL Soft does.
///
/// # Safety
/// `attributes` must be null or a zero-key-terminated pair list.
pub unsafe extern "C" fn fake_alc_create_context(
    device: *mut c_void,
    attributes: *const ALCint,
) -> *mut c_void {
    let received = (!attributes.is_null()).then(|| {
        let mut list = Vec::new();
        let mut index = 0;
        while *attributes.add(index) != 0 {
            list.push(*attributes.add(index));
            list.push(*attributes.add(index + 1));
            index += 2;
        }
        list.push(0);
        list
    });
    LAST_CONTEXT_ATTRIBUTES.with(|last| *last.borrow_mut() = received);

    if device == device_ptr() {
        LIVE_CONTEXTS.with(|live| live.set(live.get() + 1));
        context_ptr()
    } else {
        ptr::null_mut()
    }
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_make_context_current(context: *mut c_void) -> ALCboolean {
    if context.is_null() || context == context_ptr() {
        ALC_TRUE
    } else {
        ALC_FALSE
    }
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_destroy_context(context: *mut c_void) {
    if context == context_ptr() {
        LIVE_CONTEXTS.with(|live| live.set(live.get().saturating_sub(1)));
    }
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_get_error(_device: *mut c_void) -> ALCenum {
    ALC_NO_ERROR
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_al_get_string(param: ALenum) -> *const c_char {
    match param {
        AL_VENDOR => as_c_str(AL_VENDOR_STRING),
        AL_VERSION => as_c_str(AL_VERSION_STRING),
        AL_RENDERER => as_c_str(AL_RENDERER_STRING),
        AL_EXTENSIONS => as_c_str(AL_EXTENSION_STRING),
        _ => ptr::null(),
    }
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_al_get_error() -> ALenum {
    AL_NO_ERROR
}

/// # Safety
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn fake_al_is_extension_present(name: *const c_char) -> ALboolean {
    match name_arg(name) {
        Some(name) if listed(AL_EXTENSION_STRING, name) => AL_TRUE,
        _ => AL_FALSE,
    }
}

/// # Safety
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn fake_al_get_enum_value(name: *const c_char) -> ALenum {
    match name_arg(name) {
        Some("AL_VENDOR") => AL_VENDOR,
        Some("AL_VERSION") => AL_VERSION,
        Some("AL_RENDERER") => AL_RENDERER,
        Some("AL_EXTENSIONS") => AL_EXTENSIONS,
        _ => 0,
    }
}

/// # Safety
/// `ids` must be valid for `count` writes.
pub unsafe extern "C" fn fake_al_gen_effects(count: c_int, ids: *mut u32) {
    for i in 0..count.max(0) as usize {
        *ids.add(i) = i as u32 + 1;
    }
}

/// # Safety
/// Pure fake; `ids` is not read.
pub unsafe extern "C" fn fake_al_delete_effects(_count: c_int, _ids: *const u32) {}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_al_is_effect(id: u32) -> ALboolean {
    if id > 0 {
        AL_TRUE
    } else {
        AL_FALSE
    }
}

/// # Safety
/// Pure fake; any arguments are accepted.
pub unsafe extern "C" fn fake_alc_device_pause_soft(_device: *mut c_void) {}
