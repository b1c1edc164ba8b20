// OpenAL Bridge - native binding layer for OpenAL
// Dynamic library resolution and checked dispatch into resolved entry points

// Module declarations
pub mod api;
pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod init;
pub mod loader;
pub mod table;
pub mod testing;
pub mod version;

// Re-exports for convenience
pub use api::*;
pub use context::AudioBindings;
pub use error::{BridgeError, ErrorCode};
pub use init::{initialize, initialize_with, InitBarrier};

use config::LoggingConfig;

/// Initialize Android logging
///
/// Routes tracing events and `log` records to logcat. Repeated calls are no-ops.
#[cfg(target_os = "android")]
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    if let Ok(layer) = tracing_android::layer("OpenALBridge") {
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(LevelFilter::from_level(config.level_filter()))
            .try_init();
    }
}

/// Initialize desktop logging
///
/// Installs a stderr fmt subscriber that also captures `log` records.
/// Repeated calls are no-ops.
#[cfg(not(target_os = "android"))]
pub fn init_logging(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.level_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// JNI_OnLoad is called when the native library is loaded by Android
/// This function initializes logging before any OpenAL call is made
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: jni::JavaVM, _reserved: *mut std::ffi::c_void) -> jni::sys::jint {
    let config = config::BridgeConfig::load();
    init_logging(&config.logging);

    log::info!("JNI_OnLoad called - OpenAL bridge loaded");

    // Return JNI version
    jni::sys::JNI_VERSION_1_6
}
