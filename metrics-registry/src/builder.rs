use std::sync::Arc;

use crate::{InvariantMonitor, LogSink, NoopSink, Registry, Strictness};

/// Builder for a [`Registry`].
pub struct RegistryBuilder {
    lock_cleanup: bool,
    strictness: Strictness,
    sink: Arc<dyn LogSink>,
}

impl RegistryBuilder {
    /// Creates a new `RegistryBuilder` with the default configuration.
    pub fn new() -> Self {
        Self { lock_cleanup: true, strictness: Strictness::default(), sink: Arc::new(NoopSink) }
    }

    /// Sets whether or not per-key initialization locks are discarded once their instrument exists.
    ///
    /// Discarding keeps the number of live locks proportional to the number of keys currently being
    /// initialized. Retaining them costs memory proportional to every key ever created, which can
    /// matter with high-cardinality or churny instrument names.
    ///
    /// Defaults to `true`.
    #[must_use]
    pub fn with_lock_cleanup(mut self, lock_cleanup: bool) -> Self {
        self.lock_cleanup = lock_cleanup;
        self
    }

    /// Sets how the registry reacts to detecting an internal invariant violation.
    ///
    /// Defaults to [`Strictness::Lenient`].
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Sets the sink that receives diagnostic messages in lenient mode.
    ///
    /// Defaults to [`NoopSink`].
    #[must_use]
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    /// Builds the registry.
    pub fn build(self) -> Registry {
        Registry::from_parts(self.lock_cleanup, InvariantMonitor::new(self.strictness, self.sink))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        RegistryBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RegistryBuilder;
    use crate::{Strictness, TracingSink};

    #[test]
    fn test_defaults() {
        let registry = RegistryBuilder::default().build();
        assert!(registry.lock_cleanup_enabled());
        assert_eq!(registry.strictness(), Strictness::Lenient);
    }

    #[test]
    fn test_overrides() {
        let registry = RegistryBuilder::new()
            .with_lock_cleanup(false)
            .with_strictness(Strictness::Strict)
            .with_sink(TracingSink)
            .build();
        assert!(!registry.lock_cleanup_enabled());
        assert_eq!(registry.strictness(), Strictness::Strict);
    }
}
