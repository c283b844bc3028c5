//! Owning facade over one engine handle.
//!
//! [`Engine`] is the only place a [`RawHandle`](crate::binding::RawHandle) is
//! kept. It is created with the handle, forwards calls with it, and releases
//! it exactly once.

mod engine;
mod state;

pub use engine::Engine;
pub use state::{LifecycleState, LifecycleStats};
