// OpenAL and ALC enum values and C scalar types used at the dispatch boundary

use std::ffi::{c_char, c_int};

pub type ALenum = c_int;
pub type ALCenum = c_int;
pub type ALint = c_int;
pub type ALCint = c_int;
pub type ALboolean = c_char;
pub type ALCboolean = c_char;

pub const AL_FALSE: ALboolean = 0;
pub const AL_TRUE: ALboolean = 1;
pub const ALC_FALSE: ALCboolean = 0;
pub const ALC_TRUE: ALCboolean = 1;

pub const AL_NO_ERROR: ALenum = 0;
pub const ALC_NO_ERROR: ALCenum = 0;

// alGetString
pub const AL_VENDOR: ALenum = 0xB001;
pub const AL_VERSION: ALenum = 0xB002;
pub const AL_RENDERER: ALenum = 0xB003;
pub const AL_EXTENSIONS: ALenum = 0xB004;

// alcGetString
pub const ALC_DEFAULT_DEVICE_SPECIFIER: ALCenum = 0x1004;
pub const ALC_DEVICE_SPECIFIER: ALCenum = 0x1005;
pub const ALC_EXTENSIONS: ALCenum = 0x1006;
pub const ALC_CAPTURE_DEVICE_SPECIFIER: ALCenum = 0x310;
pub const ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER: ALCenum = 0x311;
pub const ALC_DEFAULT_ALL_DEVICES_SPECIFIER: ALCenum = 0x1012;
pub const ALC_ALL_DEVICES_SPECIFIER: ALCenum = 0x1013;

pub const ALC_ENUMERATION_EXT: &str = "ALC_ENUMERATION_EXT";
pub const ALC_ENUMERATE_ALL_EXT: &str = "ALC_ENUMERATE_ALL_EXT";

/// ALC string parameters that yield a device list when queried without a device
pub const ALC_DEVICE_LIST_PARAMS: [ALCenum; 3] = [
    ALC_DEVICE_SPECIFIER,
    ALC_CAPTURE_DEVICE_SPECIFIER,
    ALC_ALL_DEVICES_SPECIFIER,
];

/// Look up an ALC string parameter by its symbolic name
pub fn alc_string_param(name: &str) -> Option<ALCenum> {
    let param = match name {
        "ALC_DEFAULT_DEVICE_SPECIFIER" => ALC_DEFAULT_DEVICE_SPECIFIER,
        "ALC_DEVICE_SPECIFIER" => ALC_DEVICE_SPECIFIER,
        "ALC_EXTENSIONS" => ALC_EXTENSIONS,
        "ALC_CAPTURE_DEVICE_SPECIFIER" => ALC_CAPTURE_DEVICE_SPECIFIER,
        "ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER" => ALC_CAPTURE_DEFAULT_DEVICE_SPECIFIER,
        "ALC_DEFAULT_ALL_DEVICES_SPECIFIER" => ALC_DEFAULT_ALL_DEVICES_SPECIFIER,
        "ALC_ALL_DEVICES_SPECIFIER" => ALC_ALL_DEVICES_SPECIFIER,
        _ => return None,
    };
    Some(param)
}
