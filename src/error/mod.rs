// Error types for the OpenAL bridge
//
// This module defines the bridge error type and its numeric codes, giving
// structured error handling suitable for the FFI boundary.

mod bridge;

pub use bridge::{log_bridge_error, BridgeError, BridgeErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
