//! Lazily populated instrument storage.

mod storage;
use self::storage::{Instrument, InstrumentTable};

use tracing::trace;

use crate::{
    instruments::{AtomicCounter, AtomicHistogram, AtomicUpDownCounter},
    Counter, Histogram, Inspection, Inspector, InstrumentConfig, InstrumentEntry, InstrumentKey,
    InstrumentOption, InvariantMonitor, InvariantViolation, LockTable, MetadataStore, Provider,
    RegistryBuilder, Strictness, UpDownCounter,
};

/// A concurrent registry of named instruments.
///
/// `Registry` hands out counters, up/down counters and histograms by name, creating each one the
/// first time it is asked for. Every distinct (kind, name) pair maps to exactly one instrument for
/// the lifetime of the registry, even when many threads ask for it at once.
///
/// ## Creation
///
/// Looking up an existing instrument never touches a per-key lock. On a miss, the instrument's
/// configuration is built from the supplied options before any lock is taken, and creation is then
/// serialized on a lock dedicated to that key: the instrument table is checked again under the
/// lock, and only if the instrument is still missing are its configuration and then the instrument
/// itself stored. The first call to complete this step wins; configurations passed by callers that
/// lost the race are discarded.
///
/// ## Inspection
///
/// [`counter_with_meta`](Registry::counter_with_meta) and its siblings take the same per-key lock,
/// so the instrument and configuration they return were held together at a single instant.
/// [`list_metadata`](Registry::list_metadata) takes no per-key lock and is only best-effort with
/// respect to concurrent creation.
///
/// ## Invariants
///
/// An instrument whose configuration cannot be found is an internal bug. It is reported through
/// the configured [`Strictness`]: strict registries panic, lenient ones log and report the
/// instrument as not found.
pub struct Registry {
    counters: InstrumentTable<AtomicCounter>,
    up_down_counters: InstrumentTable<AtomicUpDownCounter>,
    histograms: InstrumentTable<AtomicHistogram>,
    metadata: MetadataStore,
    locks: LockTable,
    monitor: InvariantMonitor,
    lock_cleanup: bool,
}

impl Registry {
    /// Creates a new `Registry` with the default configuration.
    ///
    /// See [`RegistryBuilder`] for the defaults.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Creates a builder for a `Registry`.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(lock_cleanup: bool, monitor: InvariantMonitor) -> Self {
        Self {
            counters: InstrumentTable::new(),
            up_down_counters: InstrumentTable::new(),
            histograms: InstrumentTable::new(),
            metadata: MetadataStore::new(),
            locks: LockTable::new(),
            monitor,
            lock_cleanup,
        }
    }

    /// Gets or creates the counter named `name`.
    ///
    /// `options` are only applied if this call creates the counter.
    pub fn counter(&self, name: &str, options: &[InstrumentOption]) -> Counter {
        self.get_or_create(&self.counters, name, options)
    }

    /// Gets or creates the up/down counter named `name`.
    ///
    /// `options` are only applied if this call creates the counter.
    pub fn up_down_counter(&self, name: &str, options: &[InstrumentOption]) -> UpDownCounter {
        self.get_or_create(&self.up_down_counters, name, options)
    }

    /// Gets or creates the histogram named `name`.
    ///
    /// `options` are only applied if this call creates the histogram.
    pub fn histogram(&self, name: &str, options: &[InstrumentOption]) -> Histogram {
        self.get_or_create(&self.histograms, name, options)
    }

    /// Gets the counter named `name` along with a copy of its configuration.
    pub fn counter_with_meta(&self, name: &str) -> Inspection<Counter> {
        self.inspect(&self.counters, name)
    }

    /// Gets the up/down counter named `name` along with a copy of its configuration.
    pub fn up_down_counter_with_meta(&self, name: &str) -> Inspection<UpDownCounter> {
        self.inspect(&self.up_down_counters, name)
    }

    /// Gets the histogram named `name` along with a copy of its configuration.
    pub fn histogram_with_meta(&self, name: &str) -> Inspection<Histogram> {
        self.inspect(&self.histograms, name)
    }

    /// Lists every instrument with stored metadata, along with a copy of that metadata.
    ///
    /// This operation takes no per-key locks and is not linearizable with concurrent creation: an
    /// entry may be listed slightly before its instrument becomes visible. Callers needing a
    /// consistent view of a single instrument should use the `*_with_meta` methods instead.
    ///
    /// Entries are ordered by kind, then by name.
    pub fn list_metadata(&self) -> Vec<InstrumentEntry> {
        let mut entries = self
            .metadata
            .entries()
            .into_iter()
            .map(|(key, config)| {
                let (kind, name) = key.into_parts();
                InstrumentEntry { kind, name, config }
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        entries
    }

    /// Gets the number of instruments in the registry, across all kinds.
    pub fn len(&self) -> usize {
        self.counters.len() + self.up_down_counters.len() + self.histograms.len()
    }

    /// Whether or not the registry holds no instruments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the number of per-key initialization locks currently held in the lock table.
    pub fn init_lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Whether or not per-key initialization locks are discarded after use.
    pub fn lock_cleanup_enabled(&self) -> bool {
        self.lock_cleanup
    }

    /// Gets the configured strictness.
    pub fn strictness(&self) -> Strictness {
        self.monitor.strictness()
    }

    fn get_or_create<T>(
        &self,
        table: &InstrumentTable<T>,
        name: &str,
        options: &[InstrumentOption],
    ) -> T::Handle
    where
        T: Instrument,
    {
        if let Some(instrument) = table.get(name) {
            return T::handle(instrument);
        }

        // Computed outside the per-key lock.
        let config = InstrumentConfig::from_options(options);

        let key = InstrumentKey::new(T::KIND, name);
        let lock = self.locks.lock_for(&key);
        let _guard = lock.lock();

        let instrument = match table.get(name) {
            Some(instrument) => {
                trace!(
                    kind = %T::KIND,
                    instrument = name,
                    "Lost creation race; discarding options."
                );
                instrument
            }
            None => {
                // Metadata must be visible no later than the instrument itself.
                self.metadata.put(key.clone(), config);
                trace!(kind = %T::KIND, instrument = name, "Created instrument.");
                table.get_or_insert(name)
            }
        };

        // A late caller may have re-created the entry after the winner released it.
        if self.lock_cleanup {
            self.locks.release(&key);
        }

        T::handle(instrument)
    }

    fn inspect<T>(&self, table: &InstrumentTable<T>, name: &str) -> Inspection<T::Handle>
    where
        T: Instrument,
    {
        let key = InstrumentKey::new(T::KIND, name);
        let lock = self.locks.lock_for(&key);
        let _guard = lock.lock();

        let instrument = match table.get(name) {
            Some(instrument) => instrument,
            None => {
                // Keep the entry if a creator is already waiting on it.
                if self.lock_cleanup {
                    self.locks.release_idle(&key);
                }
                return Inspection::not_found();
            }
        };

        let inspection = match self.metadata.get(&key) {
            Some(config) => Inspection::found(T::handle(instrument), config),
            None => {
                self.monitor.report(InvariantViolation::MetadataMissing { key: key.clone() });
                Inspection {
                    instrument: Some(T::handle(instrument)),
                    config: InstrumentConfig::default(),
                    found: false,
                }
            }
        };

        // The instrument exists, so nobody will need this lock to create it again.
        if self.lock_cleanup {
            self.locks.release(&key);
        }

        inspection
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Provider for Registry {
    fn counter(&self, name: &str, options: &[InstrumentOption]) -> Counter {
        Registry::counter(self, name, options)
    }

    fn up_down_counter(&self, name: &str, options: &[InstrumentOption]) -> UpDownCounter {
        Registry::up_down_counter(self, name, options)
    }

    fn histogram(&self, name: &str, options: &[InstrumentOption]) -> Histogram {
        Registry::histogram(self, name, options)
    }
}

impl Inspector for Registry {
    fn counter_with_meta(&self, name: &str) -> Inspection<Counter> {
        Registry::counter_with_meta(self, name)
    }

    fn up_down_counter_with_meta(&self, name: &str) -> Inspection<UpDownCounter> {
        Registry::up_down_counter_with_meta(self, name)
    }

    fn histogram_with_meta(&self, name: &str) -> Inspection<Histogram> {
        Registry::histogram_with_meta(self, name)
    }

    fn list_metadata(&self) -> Vec<InstrumentEntry> {
        Registry::list_metadata(self)
    }
}
