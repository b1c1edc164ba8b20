//! One-time initialization of the process-wide bindings.
//!
//! The first caller of [`initialize`] loads OpenAL; every other caller, on
//! any thread, blocks until that finishes and then observes the same result.
//! A failed load is cached like a successful one and never retried.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::BridgeConfig;
use crate::context::AudioBindings;
use crate::error::BridgeError;
use crate::loader::{Platform, SystemLibraryOpener};

/// Once-barrier holding the outcome of a fallible initialization
pub struct InitBarrier<T> {
    cell: OnceCell<Result<Arc<T>, BridgeError>>,
}

impl<T> InitBarrier<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Run `init` if no caller has yet, then return the stored outcome.
    ///
    /// Concurrent callers wait for the running `init`; it executes at most
    /// once per barrier.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<T>, BridgeError>
    where
        F: FnOnce() -> Result<T, BridgeError>,
    {
        self.cell.get_or_init(|| init().map(Arc::new)).clone()
    }

    /// Stored outcome, `None` before the first initialization completes.
    pub fn get(&self) -> Option<Result<Arc<T>, BridgeError>> {
        self.cell.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for InitBarrier<T> {
    fn default() -> Self {
        Self::new()
    }
}

static BINDINGS: InitBarrier<AudioBindings> = InitBarrier::new();

/// Load OpenAL for this process with the configuration from the environment.
///
/// Idempotent: later calls return the first outcome.
pub fn initialize() -> Result<Arc<AudioBindings>, BridgeError> {
    BINDINGS.get_or_init(|| {
        let config = BridgeConfig::load();
        crate::init_logging(&config.logging);
        log::info!(
            "[Init] Loading OpenAL (platform={:?}, prefer_system={})",
            Platform::current(),
            config.library.prefer_system
        );
        if config.logging.debug_enabled("Loader") {
            log::debug!("[Init] Library config: {:?}", config.library);
        }
        AudioBindings::load(
            &config.library,
            Platform::current(),
            Arc::new(SystemLibraryOpener::new()),
        )
    })
}

/// Like [`initialize`], with a caller-supplied startup sequence.
///
/// `startup` only runs if nothing initialized the process bindings yet.
pub fn initialize_with<F>(startup: F) -> Result<Arc<AudioBindings>, BridgeError>
where
    F: FnOnce() -> Result<AudioBindings, BridgeError>,
{
    BINDINGS.get_or_init(startup)
}

/// Process bindings if initialization already completed successfully.
pub fn bindings() -> Option<Arc<AudioBindings>> {
    BINDINGS.get().and_then(Result::ok)
}
