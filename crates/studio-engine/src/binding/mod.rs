//! Binding layer for the external engine.
//!
//! This module is responsible for:
//! - describing the four entry points the engine library exports
//! - representing the engine's opaque handle
//! - binding those entry points to the library's symbols at runtime
//!
//! It performs no handle tracking, no retries, and no error translation.
//! Ownership rules live one level up, in [`crate::facade`].

mod native;
mod symbols;

use std::ffi::c_void;
use std::fmt;
use std::ptr;

pub use native::NativeBinding;
pub use symbols::SymbolNames;

/// Opaque engine handle.
///
/// An address-sized token minted by the external component. Its bits are never
/// interpreted; the only property inspected is nullness, which `create` uses as
/// its failure sentinel.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawHandle(*mut c_void);

impl RawHandle {
    pub const NULL: Self = Self(ptr::null_mut());

    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Builds a handle from a bare address. Mostly useful for test doubles.
    pub fn from_addr(addr: usize) -> Self {
        Self(ptr::without_provenance_mut(addr))
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    pub fn addr(self) -> usize {
        self.0.addr()
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawHandle({:#x})", self.addr())
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.addr())
    }
}

/// The four operations exported by an engine library.
///
/// [`NativeBinding`] binds them to a dynamically loaded library; tests
/// substitute a recording double.
///
/// `Error` is whatever the external component reports. It is passed through
/// unchanged. Components whose entry points cannot fail use
/// [`std::convert::Infallible`].
pub trait EngineBinding {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Requests a new engine instance. A null handle signals failure.
    fn create(&mut self) -> RawHandle;

    /// Prepares the instance for execution.
    ///
    /// # Safety
    ///
    /// `handle` must have been returned by `create` on this binding and must
    /// not have been passed to `terminate`.
    unsafe fn initialize(&mut self, handle: RawHandle) -> Result<(), Self::Error>;

    /// Runs the instance's main behavior. Whether this blocks is up to the
    /// external component.
    ///
    /// # Safety
    ///
    /// Same contract as [`EngineBinding::initialize`].
    unsafe fn execute(&mut self, handle: RawHandle) -> Result<(), Self::Error>;

    /// Releases every resource behind `handle`.
    ///
    /// # Safety
    ///
    /// Same contract as [`EngineBinding::initialize`]. The handle is dead
    /// afterwards and must never be passed to this binding again.
    unsafe fn terminate(&mut self, handle: RawHandle) -> Result<(), Self::Error>;
}
