//! Thread-safe instrument storage.
use parking_lot::Mutex;
use portable_atomic::{AtomicI64, Ordering};

/// Atomic storage for a monotonic counter.
///
/// Negative deltas are not rejected: keeping a counter monotonic is the caller's responsibility.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicI64,
}

impl AtomicCounter {
    /// Adds `delta` to the counter.
    pub fn add(&self, delta: i64) {
        let _ = self.value.fetch_add(delta, Ordering::AcqRel);
    }

    /// Gets the current value.
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }
}

/// Atomic storage for a counter that can move up or down.
#[derive(Debug, Default)]
pub struct AtomicUpDownCounter {
    value: AtomicI64,
}

impl AtomicUpDownCounter {
    /// Adds `delta`, positive or negative, to the counter.
    pub fn add(&self, delta: i64) {
        let _ = self.value.fetch_add(delta, Ordering::AcqRel);
    }

    /// Gets the current value.
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }
}

/// A point-in-time view of a histogram.
///
/// `min` and `max` are `None` until the first value has been recorded, and `mean` is `0.0` in that
/// case.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistogramSnapshot {
    /// Number of recorded values.
    pub count: u64,
    /// Sum of all recorded values.
    pub sum: f64,
    /// Smallest recorded value.
    pub min: Option<f64>,
    /// Largest recorded value.
    pub max: Option<f64>,
    /// `sum / count`, or `0.0` when nothing has been recorded.
    pub mean: f64,
}

#[derive(Debug, Default)]
struct HistogramState {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

/// Storage for a histogram tracking count, sum, min and max.
///
/// No buckets are maintained. Recording and snapshotting are mutually exclusive, so a snapshot
/// never observes a partially applied record.
#[derive(Debug, Default)]
pub struct AtomicHistogram {
    state: Mutex<HistogramState>,
}

impl AtomicHistogram {
    /// Records a value.
    pub fn record(&self, value: f64) {
        let mut state = self.state.lock();
        if state.count == 0 {
            state.min = value;
            state.max = value;
        } else {
            state.min = state.min.min(value);
            state.max = state.max.max(value);
        }
        state.count += 1;
        state.sum += value;
    }

    /// Takes a snapshot of the histogram.
    pub fn snapshot(&self) -> HistogramSnapshot {
        let (count, sum, min, max) = {
            let state = self.state.lock();
            (state.count, state.sum, state.min, state.max)
        };

        if count == 0 {
            return HistogramSnapshot::default();
        }

        HistogramSnapshot { count, sum, min: Some(min), max: Some(max), mean: sum / count as f64 }
    }
}
