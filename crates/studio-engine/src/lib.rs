//! Studio engine crate.
//!
//! This crate owns the interop with the external `StudioInterface` library:
//! a binding layer exposing its four entry points and a facade that holds one
//! engine handle and releases it exactly once.

pub mod binding;
pub mod config;
pub mod error;
pub mod facade;
pub mod logging;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use binding::{EngineBinding, NativeBinding, RawHandle, SymbolNames};
pub use config::{ConfigOrigin, LibraryConfig, LogStyle, LoggingSection, StartupConfig, StudioConfig};
pub use error::EngineError;
pub use facade::{Engine, LifecycleState, LifecycleStats};
pub use session::{SessionError, Stage};
