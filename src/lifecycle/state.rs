//! Lifecycle state definitions.

/// State of the service lifecycle.
///
/// Exactly one forward path is valid per run:
/// `Idle → Starting → Running → Stopping → Stopped`, with `Failed`
/// reachable from `Starting` (bootstrap error) or `Running` (transport
/// fault). `Failed` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, not yet started.
    Idle,
    /// Start requested; binding and materializing TLS.
    Starting,
    /// Bound and serving traffic.
    Running,
    /// A fatal bootstrap or transport error occurred. Terminal.
    Failed,
    /// Stop requested; draining in-flight calls.
    Stopping,
    /// Fully shut down. Terminal.
    Stopped,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Failed => "failed",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
