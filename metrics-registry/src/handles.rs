use std::sync::Arc;

use crate::instruments::{AtomicCounter, AtomicHistogram, AtomicUpDownCounter, HistogramSnapshot};

/// A counter.
///
/// Clones are shallow and refer to the same underlying instrument.
#[derive(Clone, Debug)]
pub struct Counter {
    inner: Option<Arc<AtomicCounter>>,
}

/// An up/down counter.
///
/// Clones are shallow and refer to the same underlying instrument.
#[derive(Clone, Debug)]
pub struct UpDownCounter {
    inner: Option<Arc<AtomicUpDownCounter>>,
}

/// A histogram.
///
/// Clones are shallow and refer to the same underlying instrument.
#[derive(Clone, Debug)]
pub struct Histogram {
    inner: Option<Arc<AtomicHistogram>>,
}

fn same<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

impl Counter {
    /// Creates a no-op `Counter` which does nothing.
    ///
    /// Suitable when a handle must be provided that does nothing i.e. a no-op provider.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Creates a `Counter` based on shared storage.
    pub fn from_arc(a: Arc<AtomicCounter>) -> Self {
        Self { inner: Some(a) }
    }

    /// Adds `delta` to the counter.
    pub fn add(&self, delta: i64) {
        if let Some(ref inner) = self.inner {
            inner.add(delta)
        }
    }

    /// Gets the current value, or zero for a no-op counter.
    pub fn value(&self) -> i64 {
        self.inner.as_ref().map_or(0, |inner| inner.value())
    }

    /// Whether or not this is a no-op handle.
    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether or not both handles refer to the same instrument.
    ///
    /// No-op handles are never the same instrument as anything.
    pub fn same_instrument(&self, other: &Counter) -> bool {
        same(&self.inner, &other.inner)
    }
}

impl UpDownCounter {
    /// Creates a no-op `UpDownCounter` which does nothing.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Creates an `UpDownCounter` based on shared storage.
    pub fn from_arc(a: Arc<AtomicUpDownCounter>) -> Self {
        Self { inner: Some(a) }
    }

    /// Adds `delta` to the counter.
    pub fn add(&self, delta: i64) {
        if let Some(ref inner) = self.inner {
            inner.add(delta)
        }
    }

    /// Gets the current value, or zero for a no-op counter.
    pub fn value(&self) -> i64 {
        self.inner.as_ref().map_or(0, |inner| inner.value())
    }

    /// Whether or not this is a no-op handle.
    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether or not both handles refer to the same instrument.
    pub fn same_instrument(&self, other: &UpDownCounter) -> bool {
        same(&self.inner, &other.inner)
    }
}

impl Histogram {
    /// Creates a no-op `Histogram` which does nothing.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Creates a `Histogram` based on shared storage.
    pub fn from_arc(a: Arc<AtomicHistogram>) -> Self {
        Self { inner: Some(a) }
    }

    /// Records a value in the histogram.
    pub fn record(&self, value: f64) {
        if let Some(ref inner) = self.inner {
            inner.record(value)
        }
    }

    /// Takes a snapshot of the histogram.
    ///
    /// A no-op histogram always reports an empty snapshot.
    pub fn snapshot(&self) -> HistogramSnapshot {
        self.inner.as_ref().map(|inner| inner.snapshot()).unwrap_or_default()
    }

    /// Whether or not this is a no-op handle.
    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether or not both handles refer to the same instrument.
    pub fn same_instrument(&self, other: &Histogram) -> bool {
        same(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_noop_handles() {
        let counter = Counter::noop();
        counter.add(123);
        assert_eq!(counter.value(), 0);
        assert!(counter.is_noop());
        assert!(!counter.same_instrument(&Counter::noop()));

        let updown = UpDownCounter::noop();
        updown.add(-5);
        assert_eq!(updown.value(), 0);

        let histogram = Histogram::noop();
        histogram.record(2.75);
        assert_eq!(histogram.snapshot(), HistogramSnapshot::default());
    }

    #[test]
    fn test_clones_share_storage() {
        let counter = Counter::from_arc(Arc::default());
        let clone = counter.clone();
        clone.add(2);
        counter.add(3);

        assert!(counter.same_instrument(&clone));
        assert_eq!(counter.value(), 5);

        let other = Counter::from_arc(Arc::default());
        assert!(!counter.same_instrument(&other));
    }
}
