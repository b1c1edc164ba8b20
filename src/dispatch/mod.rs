//! Dispatch into resolved native entry points.
//!
//! Every call goes through [`checked`]: the entry point must be present in
//! its table, otherwise the call fails with `UnsupportedOperation` naming the
//! function and nothing is invoked.

pub mod al;
pub mod alc;
pub mod strings;

pub use al::Al;
pub use alc::{is_double_null_terminated_string, Alc, ContextHandle, DeviceHandle};
pub use strings::{decode_ascii, encode_ascii, split_double_null_terminated};

use crate::error::BridgeError;
use crate::table::{NativeFn, ProcAddressTable};

/// Call `invoke` with the callable pointer of `function`.
pub fn checked<F, R>(function: NativeFn<F>, invoke: impl FnOnce(F) -> R) -> Result<R, BridgeError>
where
    F: Copy,
{
    let callable = function.get().map_err(|err| {
        log::debug!("[Dispatch] {} is not available in the loaded library", function.symbol());
        err
    })?;
    Ok(invoke(callable))
}

/// Look up `name` in `table` with signature `F` and call it.
///
/// # Safety
/// `F` must be the native signature of `name`, and `invoke` must uphold the
/// native function's own contract.
pub(crate) unsafe fn call<F, R>(
    table: &ProcAddressTable,
    name: &str,
    invoke: impl FnOnce(F) -> R,
) -> Result<R, BridgeError>
where
    F: Copy,
{
    checked(table.function::<F>(name)?, invoke)
}
