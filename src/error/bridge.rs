// Bridge error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use log::error;
use std::fmt;

/// Bridge error code constants exposed to the managed runtime via FFI
///
/// These constants are the single source of truth for error codes shared
/// between Rust and the calling runtime.
///
/// Error code range: 1001-1009
#[frb(unignore)]
pub struct BridgeErrorCodes {}

#[frb]
impl BridgeErrorCodes {
    /// No OpenAL tool library candidate could be loaded
    pub const TOOL_LIBRARY_MISSING: i32 = 1001;

    /// A required glue library could not be loaded
    pub const GLUE_LIBRARY_MISSING: i32 = 1002;

    /// A proc address table could not be populated
    pub const TABLE_INIT_FAILED: i32 = 1003;

    /// The requested entry point is absent from the loaded library
    pub const UNSUPPORTED_OPERATION: i32 = 1004;

    /// Caller violated an input contract
    pub const INVALID_ARGUMENT: i32 = 1005;

    /// A name for the library cannot be encoded as US-ASCII
    pub const ENCODING_FAILED: i32 = 1006;

    /// A single library candidate failed to open
    pub const LIBRARY_OPEN_FAILED: i32 = 1007;

    /// A table lock was poisoned
    pub const LOCK_POISONED: i32 = 1008;

    /// No device or context could be opened for a query
    pub const DEVICE_UNAVAILABLE: i32 = 1009;

    /// Get TOOL_LIBRARY_MISSING error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn tool_library_missing() -> i32 {
        Self::TOOL_LIBRARY_MISSING
    }

    /// Get GLUE_LIBRARY_MISSING error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn glue_library_missing() -> i32 {
        Self::GLUE_LIBRARY_MISSING
    }

    /// Get TABLE_INIT_FAILED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn table_init_failed() -> i32 {
        Self::TABLE_INIT_FAILED
    }

    /// Get UNSUPPORTED_OPERATION error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn unsupported_operation() -> i32 {
        Self::UNSUPPORTED_OPERATION
    }

    /// Get INVALID_ARGUMENT error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn invalid_argument() -> i32 {
        Self::INVALID_ARGUMENT
    }

    /// Get ENCODING_FAILED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn encoding_failed() -> i32 {
        Self::ENCODING_FAILED
    }

    /// Get LIBRARY_OPEN_FAILED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn library_open_failed() -> i32 {
        Self::LIBRARY_OPEN_FAILED
    }

    /// Get LOCK_POISONED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn lock_poisoned() -> i32 {
        Self::LOCK_POISONED
    }

    /// Get DEVICE_UNAVAILABLE error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn device_unavailable() -> i32 {
        Self::DEVICE_UNAVAILABLE
    }
}

/// Log a bridge error with structured context
///
/// Emits the numeric code, the originating component and the message at
/// error level.
pub fn log_bridge_error(err: &BridgeError, context: &str) {
    error!(
        "Bridge error in {}: code={}, component=OpenALBridge, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while loading OpenAL or dispatching into it
///
/// The first three variants are fatal initialization failures; the one-time
/// setup path surfaces them and never retries. `UnsupportedOperation` is
/// recoverable: the caller may probe availability and degrade.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// No tool library candidate loaded
    ToolLibraryMissing { attempted: Vec<String> },

    /// At least one glue library failed to load
    GlueLibraryMissing { missing: Vec<String> },

    /// A proc address table could not be built
    TableInitFailed { group: String, reason: String },

    /// Entry point address is zero in the loaded library
    UnsupportedOperation { function: String },

    /// Caller contract violation (null resolver handle, empty name, wrong string call)
    InvalidArgument { reason: String },

    /// A name passed to the library could not be encoded as US-ASCII
    Encoding { details: String },

    /// One library candidate failed to open
    LibraryOpenFailed { name: String, reason: String },

    /// Mutex/RwLock was poisoned
    LockPoisoned { component: String },

    /// alcOpenDevice or alcCreateContext returned null
    DeviceUnavailable { reason: String },
}

impl BridgeError {
    /// True for failures that make the binding unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::ToolLibraryMissing { .. }
                | BridgeError::GlueLibraryMissing { .. }
                | BridgeError::TableInitFailed { .. }
        )
    }

    pub(crate) fn unsupported(function: &str) -> Self {
        BridgeError::UnsupportedOperation {
            function: function.to_string(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        BridgeError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for BridgeError {
    fn code(&self) -> i32 {
        match self {
            BridgeError::ToolLibraryMissing { .. } => BridgeErrorCodes::TOOL_LIBRARY_MISSING,
            BridgeError::GlueLibraryMissing { .. } => BridgeErrorCodes::GLUE_LIBRARY_MISSING,
            BridgeError::TableInitFailed { .. } => BridgeErrorCodes::TABLE_INIT_FAILED,
            BridgeError::UnsupportedOperation { .. } => BridgeErrorCodes::UNSUPPORTED_OPERATION,
            BridgeError::InvalidArgument { .. } => BridgeErrorCodes::INVALID_ARGUMENT,
            BridgeError::Encoding { .. } => BridgeErrorCodes::ENCODING_FAILED,
            BridgeError::LibraryOpenFailed { .. } => BridgeErrorCodes::LIBRARY_OPEN_FAILED,
            BridgeError::LockPoisoned { .. } => BridgeErrorCodes::LOCK_POISONED,
            BridgeError::DeviceUnavailable { .. } => BridgeErrorCodes::DEVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            BridgeError::ToolLibraryMissing { attempted } => {
                format!(
                    "Couldn't load native AL library (tried: {})",
                    attempted.join(", ")
                )
            }
            BridgeError::GlueLibraryMissing { missing } => {
                format!(
                    "Couldn't load native AL glue library: {}",
                    missing.join(", ")
                )
            }
            BridgeError::TableInitFailed { group, reason } => {
                format!("Couldn't initialize {} proc address table: {}", group, reason)
            }
            BridgeError::UnsupportedOperation { function } => {
                format!("Method \"{}\" not available", function)
            }
            BridgeError::InvalidArgument { reason } => reason.clone(),
            BridgeError::Encoding { details } => {
                format!("Failed to encode name as US-ASCII: {}", details)
            }
            BridgeError::LibraryOpenFailed { name, reason } => {
                format!("Failed to open {}: {}", name, reason)
            }
            BridgeError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            BridgeError::DeviceUnavailable { reason } => {
                format!("OpenAL device unavailable: {}", reason)
            }
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BridgeError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for BridgeError {}
