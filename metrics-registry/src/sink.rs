use std::sync::Arc;

use tracing::Level;

/// A destination for diagnostic messages emitted by the registry.
///
/// The registry only logs when it detects an internal inconsistency while running in
/// [`Strictness::Lenient`](crate::Strictness::Lenient) mode.
pub trait LogSink: Send + Sync {
    /// Logs `message` at the given `level`.
    fn log(&self, level: Level, message: &str);
}

/// A sink that discards every message.
///
/// Used by default when no sink is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// A sink that forwards messages to [`tracing`] under the `metrics_registry` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "metrics_registry", "{}", message),
            Level::WARN => tracing::warn!(target: "metrics_registry", "{}", message),
            Level::INFO => tracing::info!(target: "metrics_registry", "{}", message),
            Level::DEBUG => tracing::debug!(target: "metrics_registry", "{}", message),
            _ => tracing::trace!(target: "metrics_registry", "{}", message),
        }
    }
}

impl<T> LogSink for Arc<T>
where
    T: LogSink + ?Sized,
{
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message)
    }
}

impl<T> LogSink for Box<T>
where
    T: LogSink + ?Sized,
{
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message)
    }
}
