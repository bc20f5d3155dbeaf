use std::sync::Arc;

use thiserror::Error;
use tracing::Level;

use crate::{instruments::AtomicCounter, InstrumentKey, LogSink};

/// Maximum number of times a given violation is logged in lenient mode.
pub const MAX_REPORTS_PER_VIOLATION: i64 = 10;

/// How the registry reacts to detecting an impossible internal state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Strictness {
    /// Panic immediately with a message naming the violation and the offending key.
    ///
    /// Meant for development and testing, where a registry bug should never go unnoticed.
    Strict,

    /// Log the violation through the configured sink, a bounded number of times per violation,
    /// and degrade the affected call to a "not found" result.
    #[default]
    Lenient,
}

impl Strictness {
    /// Derives the strictness from the build profile: strict when debug assertions are enabled,
    /// lenient otherwise.
    pub const fn from_build() -> Strictness {
        if cfg!(debug_assertions) {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

/// An internal state that should be impossible under correct operation.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum InvariantViolation {
    /// An instrument exists for a key that has no stored metadata.
    #[error("invariant violation: {kind}_meta_missing for {key}", kind = .key.kind())]
    MetadataMissing {
        /// Key of the instrument missing its metadata.
        key: InstrumentKey,
    },
}

impl InvariantViolation {
    /// Gets the key the violation was detected for.
    pub fn key(&self) -> &InstrumentKey {
        match self {
            InvariantViolation::MetadataMissing { key } => key,
        }
    }
}

/// Detects and reports invariant violations according to a [`Strictness`] policy.
///
/// Lenient-mode reports are rate limited per violation (kind and key), tallied with the same
/// counter storage used for instruments. Tallies are kept apart from instrument metadata and are
/// never visible to callers of the registry.
pub struct InvariantMonitor {
    strictness: Strictness,
    sink: Arc<dyn LogSink>,
    tallies: scc::HashMap<InvariantViolation, AtomicCounter>,
}

impl InvariantMonitor {
    /// Creates a new `InvariantMonitor`.
    pub fn new(strictness: Strictness, sink: Arc<dyn LogSink>) -> Self {
        Self { strictness, sink, tallies: scc::HashMap::new() }
    }

    /// Gets the configured strictness.
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Reports a violation.
    ///
    /// # Panics
    ///
    /// Panics when running in [`Strictness::Strict`] mode.
    pub fn report(&self, violation: InvariantViolation) {
        if self.strictness == Strictness::Strict {
            panic!("[metrics] {}", violation);
        }

        // The entry holds the bucket lock, so the add and the read are a single step.
        let seen = {
            let entry =
                self.tallies.entry(violation.clone()).or_insert_with(AtomicCounter::default);
            entry.get().add(1);
            entry.get().value()
        };
        if seen > MAX_REPORTS_PER_VIOLATION {
            return;
        }

        self.sink.log(Level::WARN, &format!("[metrics] {}", violation));
    }

    /// Gets the number of times `violation` has been reported, including suppressed reports.
    pub fn reported(&self, violation: &InvariantViolation) -> i64 {
        self.tallies.read(violation, |_, tally| tally.value()).unwrap_or(0)
    }
}
