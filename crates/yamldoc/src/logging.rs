//! Optional debug side channel for file handles.

/// Sink for debug-only messages emitted by a handle
pub trait DebugLog: Send + Sync {
    /// Whether debug messages should be produced at all
    fn is_debug_enabled(&self) -> bool;

    fn debug(&self, message: &str);
}

/// Forwards to the `log` facade under the `yamldoc` target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl DebugLog for LogFacade {
    fn is_debug_enabled(&self) -> bool {
        log::log_enabled!(target: "yamldoc", log::Level::Debug)
    }

    fn debug(&self, message: &str) {
        log::debug!(target: "yamldoc", "{}", message);
    }
}
