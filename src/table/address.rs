//! Resolved native addresses.
//!
//! A resolved entry point is a tagged value rather than a bare integer: it is
//! either absent or a non-zero address. Turning it into something callable
//! goes through [`NativeFn::get`], which refuses absent entries, so no call
//! site can reach address zero.

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroUsize;

use crate::error::BridgeError;

/// Address of a native function, or its absence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcAddress {
    /// Not exported by the loaded library
    #[default]
    Absent,
    Present(NonZeroUsize),
}

impl ProcAddress {
    pub fn from_raw(address: usize) -> Self {
        NonZeroUsize::new(address).map_or(ProcAddress::Absent, ProcAddress::Present)
    }

    pub fn from_ptr(ptr: *const c_void) -> Self {
        Self::from_raw(ptr as usize)
    }

    /// Numeric value, 0 when absent.
    pub fn as_raw(self) -> usize {
        match self {
            ProcAddress::Absent => 0,
            ProcAddress::Present(address) => address.get(),
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, ProcAddress::Present(_))
    }

    /// Keep `self` when present, otherwise evaluate `other`.
    pub fn or_else<F>(self, other: F) -> Result<Self, BridgeError>
    where
        F: FnOnce() -> Result<Self, BridgeError>,
    {
        match self {
            ProcAddress::Present(_) => Ok(self),
            ProcAddress::Absent => other(),
        }
    }
}

impl fmt::Display for ProcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcAddress::Absent => write!(f, "<absent>"),
            ProcAddress::Present(address) => write!(f, "{:#x}", address.get()),
        }
    }
}

/// An address together with the symbol it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub symbol: String,
    pub address: ProcAddress,
}

impl ResolvedAddress {
    pub fn new(symbol: impl Into<String>, address: ProcAddress) -> Self {
        Self {
            symbol: symbol.into(),
            address,
        }
    }

    pub fn is_available(&self) -> bool {
        self.address.is_present()
    }
}

/// A resolved entry point typed with its native signature.
///
/// `F` is an `unsafe extern "C" fn(..)` pointer type.
pub struct NativeFn<F> {
    symbol: &'static str,
    address: ProcAddress,
    _signature: PhantomData<F>,
}

impl<F> Clone for NativeFn<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for NativeFn<F> {}

impl<F> fmt::Debug for NativeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("symbol", &self.symbol)
            .field("address", &self.address)
            .finish()
    }
}

impl<F: Copy> NativeFn<F> {
    /// Attach a signature to a resolved address.
    ///
    /// # Safety
    /// `F` must be a function pointer type matching the native signature of
    /// `symbol`.
    pub unsafe fn new(symbol: &'static str, address: ProcAddress) -> Self {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<usize>(),
            "NativeFn signature must be a function pointer"
        );
        Self {
            symbol,
            address,
            _signature: PhantomData,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn address(&self) -> ProcAddress {
        self.address
    }

    pub fn is_available(&self) -> bool {
        self.address.is_present()
    }

    /// Callable pointer, or `UnsupportedOperation` naming the symbol.
    pub fn get(&self) -> Result<F, BridgeError> {
        match self.address {
            ProcAddress::Absent => Err(BridgeError::unsupported(self.symbol)),
            ProcAddress::Present(address) => {
                let raw = address.get();
                // SAFETY: `new` guarantees F is a pointer-sized fn pointer type
                // for this symbol, and `raw` is non-zero.
                Ok(unsafe { std::mem::transmute_copy::<usize, F>(&raw) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type AddFn = unsafe extern "C" fn(i32, i32) -> i32;

    unsafe extern "C" fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    #[test]
    fn test_zero_is_absent() {
        assert_eq!(ProcAddress::from_raw(0), ProcAddress::Absent);
        assert_eq!(ProcAddress::Absent.as_raw(), 0);
        assert!(!ProcAddress::default().is_present());
        assert_eq!(ProcAddress::from_ptr(std::ptr::null()), ProcAddress::Absent);
    }

    #[test]
    fn test_present_roundtrips_raw_value() {
        let address = ProcAddress::from_raw(0x1000);
        assert!(address.is_present());
        assert_eq!(address.as_raw(), 0x1000);
        assert_eq!(address.to_string(), "0x1000");
    }

    #[test]
    fn test_absent_native_fn_is_unsupported() {
        let function = unsafe { NativeFn::<AddFn>::new("alAdd", ProcAddress::Absent) };
        assert!(!function.is_available());
        assert_eq!(
            function.get().unwrap_err(),
            BridgeError::UnsupportedOperation {
                function: "alAdd".to_string()
            }
        );
    }

    #[test]
    fn test_present_native_fn_calls_through() {
        let address = ProcAddress::from_raw(add as AddFn as usize);
        let function = unsafe { NativeFn::<AddFn>::new("alAdd", address) };
        let callable = function.get().unwrap();
        assert_eq!(unsafe { callable(2, 3) }, 5);
    }

    #[test]
    fn test_or_else_only_runs_when_absent() {
        let present = ProcAddress::from_raw(8);
        let kept = present.or_else(|| panic!("must not run")).unwrap();
        assert_eq!(kept, present);

        let filled = ProcAddress::Absent
            .or_else(|| Ok(ProcAddress::from_raw(16)))
            .unwrap();
        assert_eq!(filled.as_raw(), 16);
    }
}
