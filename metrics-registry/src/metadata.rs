use crate::{InstrumentConfig, InstrumentKey};

/// Stores the configuration of every created instrument.
///
/// Each key is written at most once and never updated. Reads always return deep copies.
#[derive(Default)]
pub struct MetadataStore {
    configs: scc::HashMap<InstrumentKey, InstrumentConfig>,
}

impl MetadataStore {
    /// Creates an empty `MetadataStore`.
    pub fn new() -> Self {
        Self { configs: scc::HashMap::new() }
    }

    /// Stores `config` for `key`.
    ///
    /// If a configuration is already stored for `key`, the existing one is kept and `false` is
    /// returned.
    pub fn put(&self, key: InstrumentKey, config: InstrumentConfig) -> bool {
        self.configs.insert(key, config).is_ok()
    }

    /// Gets a copy of the configuration stored for `key`.
    pub fn get(&self, key: &InstrumentKey) -> Option<InstrumentConfig> {
        self.configs.read(key, |_, config| config.clone())
    }

    /// Whether or not a configuration is stored for `key`.
    pub fn contains(&self, key: &InstrumentKey) -> bool {
        self.configs.contains(key)
    }

    /// Gets a copy of every stored key and configuration.
    ///
    /// Entries inserted while the scan is in progress may or may not be observed.
    pub fn entries(&self) -> Vec<(InstrumentKey, InstrumentConfig)> {
        let mut entries = Vec::with_capacity(self.configs.len());
        self.configs.scan(|key, config| entries.push((key.clone(), config.clone())));
        entries
    }

    /// Gets the number of stored configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether or not the store is empty.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MetadataStore;
    use crate::{InstrumentConfig, InstrumentKey, InstrumentKind, InstrumentOption};

    fn key(name: &str) -> InstrumentKey {
        InstrumentKey::new(InstrumentKind::Counter, name)
    }

    #[test]
    fn test_first_put_wins() {
        let store = MetadataStore::new();
        assert!(store.is_empty());

        let first = InstrumentConfig::from_options(&[InstrumentOption::description("A")]);
        let second = InstrumentConfig::from_options(&[InstrumentOption::description("B")]);
        assert!(store.put(key("x"), first.clone()));
        assert!(!store.put(key("x"), second));

        assert_eq!(store.get(&key("x")), Some(first));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_returns_copy() {
        let store = MetadataStore::new();
        let config = InstrumentConfig::from_options(&[InstrumentOption::attributes([("k", "v")])]);
        store.put(key("x"), config);

        let mut copy = store.get(&key("x")).expect("config should be stored");
        copy.attributes.insert("k".to_string(), "mutated".to_string());

        let again = store.get(&key("x")).expect("config should be stored");
        assert_eq!(again.attributes["k"], "v");
    }

    #[test]
    fn test_missing_key() {
        let store = MetadataStore::new();
        assert!(store.get(&key("missing")).is_none());
        assert!(!store.contains(&key("missing")));
    }

    #[test]
    fn test_entries() {
        let store = MetadataStore::new();
        store.put(key("a"), InstrumentConfig::default());
        store.put(InstrumentKey::new(InstrumentKind::Histogram, "a"), InstrumentConfig::default());

        let mut entries = store.entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let keys = entries.into_iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["counter:a", "histogram:a"]);
    }
}
