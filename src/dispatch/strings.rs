//! Marshalling of native strings.
//!
//! Native results are decoded as US-ASCII; bytes outside it become U+FFFD,
//! so a device name in another encoding never hides the rest of a list.
//! Device lists come back as double-null-terminated byte sequences:
//! NUL-terminated elements followed by an empty element. Names passed to
//! the library are encoded the other way and must be plain ASCII.

use std::ffi::{c_char, CStr, CString};

use crate::error::BridgeError;

/// Decode `bytes` as US-ASCII, replacing every byte above 0x7F with U+FFFD.
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| {
            if byte.is_ascii() {
                byte as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// Encode `name` as a NUL-terminated US-ASCII string for the library.
///
/// Non-ASCII text fails with `Encoding`; an interior NUL is an
/// `InvalidArgument`.
pub fn encode_ascii(name: &str) -> Result<CString, BridgeError> {
    if let Some((offset, ch)) = name.char_indices().find(|(_, ch)| !ch.is_ascii()) {
        return Err(BridgeError::Encoding {
            details: format!("{:?} at offset {} of {:?} is outside US-ASCII", ch, offset, name),
        });
    }
    CString::new(name).map_err(|_| {
        BridgeError::invalid_argument(format!("{:?} contains an interior NUL byte", name))
    })
}

/// Elements of a double-null-terminated sequence, without decoding.
///
/// Iteration ends at the first empty element or at the end of `bytes`,
/// whichever comes first.
pub fn double_null_terminated_elements(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|byte| *byte == 0)
        .take_while(|element| !element.is_empty())
}

/// Split and decode a double-null-terminated sequence.
///
/// `b"alsa\0pulse\0\0"` yields `["alsa", "pulse"]`; empty input yields an
/// empty list. The terminating empty element is never part of the result.
pub fn split_double_null_terminated(bytes: &[u8]) -> Vec<String> {
    double_null_terminated_elements(bytes)
        .map(decode_ascii)
        .collect()
}

/// Bytes of a NUL-terminated native string, without the terminator.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub unsafe fn c_string_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_bytes())
}

/// Length of a native double-null-terminated sequence.
///
/// Counts every element with its own NUL and stops before the NUL of the
/// terminating empty element.
///
/// # Safety
/// `ptr` must be non-null and point to a double-null-terminated sequence.
pub unsafe fn double_null_terminated_len(ptr: *const c_char) -> usize {
    let bytes = ptr as *const u8;
    let mut len = 0;
    loop {
        let at_element_start = len == 0 || *bytes.add(len - 1) == 0;
        if at_element_start && *bytes.add(len) == 0 {
            return len;
        }
        len += 1;
    }
}

/// Bytes of a native double-null-terminated sequence.
///
/// # Safety
/// `ptr` must be null or point to a double-null-terminated sequence that
/// stays valid for `'a`.
pub unsafe fn double_null_terminated_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    let len = double_null_terminated_len(ptr);
    Some(std::slice::from_raw_parts(ptr as *const u8, len))
}
