use std::fmt;

/// Where an engine is in its lifecycle.
///
/// `Initialized` and `Executed` may be re-entered any number of times.
/// `Terminated` is final.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleState {
    /// Handle created, nothing forwarded yet.
    Created,
    /// Last successful call was `initialize`.
    Initialized,
    /// Last successful call was `execute`.
    Executed,
    /// Handle released.
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Initialized => "initialized",
            Self::Executed => "executed",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Calls forwarded to the binding, successful or not.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LifecycleStats {
    pub initialize_calls: u32,
    pub execute_calls: u32,
}
