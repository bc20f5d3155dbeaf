use std::sync::Arc;

use crate::{
    instruments::{AtomicCounter, AtomicHistogram, AtomicUpDownCounter},
    Counter, Histogram, InstrumentKind, UpDownCounter,
};

/// Defines how a kind of instrument is stored and handed out.
pub(crate) trait Instrument: Default {
    /// The kind of instrument this storage backs.
    const KIND: InstrumentKind;

    /// The handle type given to callers.
    type Handle;

    /// Wraps shared storage in a caller-facing handle.
    fn handle(storage: Arc<Self>) -> Self::Handle;
}

impl Instrument for AtomicCounter {
    const KIND: InstrumentKind = InstrumentKind::Counter;
    type Handle = Counter;

    fn handle(storage: Arc<Self>) -> Self::Handle {
        Counter::from_arc(storage)
    }
}

impl Instrument for AtomicUpDownCounter {
    const KIND: InstrumentKind = InstrumentKind::UpDownCounter;
    type Handle = UpDownCounter;

    fn handle(storage: Arc<Self>) -> Self::Handle {
        UpDownCounter::from_arc(storage)
    }
}

impl Instrument for AtomicHistogram {
    const KIND: InstrumentKind = InstrumentKind::Histogram;
    type Handle = Histogram;

    fn handle(storage: Arc<Self>) -> Self::Handle {
        Histogram::from_arc(storage)
    }
}

/// A name-to-instrument table for a single instrument kind.
///
/// Entries are only ever added: once stored, an instrument is never replaced or removed.
pub(crate) struct InstrumentTable<T> {
    instruments: scc::HashMap<String, Arc<T>>,
}

impl<T> InstrumentTable<T>
where
    T: Instrument,
{
    pub fn new() -> Self {
        Self { instruments: scc::HashMap::new() }
    }

    /// Gets the instrument stored under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.instruments.read(name, |_, instrument| Arc::clone(instrument))
    }

    /// Gets the instrument stored under `name`, storing a new, empty one if none exists.
    pub fn get_or_insert(&self, name: &str) -> Arc<T> {
        let entry = self.instruments.entry(name.to_string()).or_insert_with(Default::default);
        Arc::clone(entry.get())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Instrument, InstrumentTable};
    use crate::instruments::{AtomicCounter, AtomicHistogram, AtomicUpDownCounter};
    use crate::InstrumentKind;

    #[test]
    fn test_kinds() {
        assert_eq!(AtomicCounter::KIND, InstrumentKind::Counter);
        assert_eq!(AtomicUpDownCounter::KIND, InstrumentKind::UpDownCounter);
        assert_eq!(AtomicHistogram::KIND, InstrumentKind::Histogram);
    }

    #[test]
    fn test_get_or_insert_keeps_first() {
        let table = InstrumentTable::<AtomicCounter>::new();
        assert!(table.get("x").is_none());

        let first = table.get_or_insert("x");
        first.add(4);
        let second = table.get_or_insert("x");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(table.get("x").map(|c| c.value()), Some(4));
        assert_eq!(table.len(), 1);
    }
}
