use std::fmt;

/// Instrument kind.
///
/// Defines the kind, or type, of an instrument held by the registry:
/// - counters
/// - up/down counters
/// - histograms
///
/// Two instruments with the same name but different kinds are distinct instruments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum InstrumentKind {
    /// Monotonic counter.
    Counter,
    /// Counter that may move in either direction.
    UpDownCounter,
    /// Count/sum/min/max accumulator.
    Histogram,
}

impl InstrumentKind {
    /// All instrument kinds, in their canonical order.
    pub const ALL: [InstrumentKind; 3] =
        [InstrumentKind::Counter, InstrumentKind::UpDownCounter, InstrumentKind::Histogram];

    /// Gets the stable, lowercase label for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Counter => "counter",
            InstrumentKind::UpDownCounter => "updown",
            InstrumentKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
