use indexmap::IndexMap;

/// Static attributes attached to an instrument.
pub type Attributes = IndexMap<String, String>;

/// Advisory metadata describing an instrument.
///
/// A configuration is fixed by whichever call creates the instrument and is never changed
/// afterwards. The registry hands out clones, so callers are free to mutate what they receive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstrumentConfig {
    /// Human-readable description.
    pub description: String,
    /// Unit of measurement, such as `"seconds"` or `"1"`.
    pub unit: String,
    /// Static key/value pairs associated with the instrument itself.
    ///
    /// Intended for small, bounded cardinality.
    pub attributes: Attributes,
}

impl InstrumentConfig {
    /// Builds a configuration by applying `options` in order, starting from an empty configuration.
    pub fn from_options(options: &[InstrumentOption]) -> InstrumentConfig {
        let mut config = InstrumentConfig::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// Returns `true` if no description, unit, or attributes are set.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.unit.is_empty() && self.attributes.is_empty()
    }
}

/// A single instrument configuration input.
///
/// Options are advisory only: the registry stores them but never validates or acts on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstrumentOption {
    /// Sets the description, replacing any earlier one.
    Description(String),
    /// Sets the unit, replacing any earlier one.
    Unit(String),
    /// Merges attributes into any already set, later values winning for the same attribute key.
    Attributes(Vec<(String, String)>),
}

impl InstrumentOption {
    /// Creates a description option.
    pub fn description<S: Into<String>>(description: S) -> Self {
        InstrumentOption::Description(description.into())
    }

    /// Creates a unit option.
    pub fn unit<S: Into<String>>(unit: S) -> Self {
        InstrumentOption::Unit(unit.into())
    }

    /// Creates an attributes option from any iterator of key/value pairs.
    pub fn attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        InstrumentOption::Attributes(
            attributes.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        )
    }

    /// Applies this option to `config`.
    pub fn apply(&self, config: &mut InstrumentConfig) {
        match self {
            InstrumentOption::Description(description) => {
                config.description.clone_from(description)
            }
            InstrumentOption::Unit(unit) => config.unit.clone_from(unit),
            InstrumentOption::Attributes(attributes) => {
                for (key, value) in attributes {
                    config.attributes.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InstrumentConfig, InstrumentOption};

    #[test]
    fn test_empty_options() {
        let config = InstrumentConfig::from_options(&[]);
        assert!(config.is_empty());
        assert_eq!(config, InstrumentConfig::default());
    }

    #[test]
    fn test_later_options_win() {
        let config = InstrumentConfig::from_options(&[
            InstrumentOption::description("first"),
            InstrumentOption::unit("ms"),
            InstrumentOption::attributes([("route", "/a"), ("method", "GET")]),
            InstrumentOption::description("second"),
            InstrumentOption::attributes([("route", "/b")]),
        ]);

        assert_eq!(config.description, "second");
        assert_eq!(config.unit, "ms");
        assert_eq!(config.attributes.len(), 2);
        assert_eq!(config.attributes["route"], "/b");
        assert_eq!(config.attributes["method"], "GET");
    }

    #[test]
    fn test_empty_attributes_are_a_no_op() {
        let config = InstrumentConfig::from_options(&[InstrumentOption::attributes(
            Vec::<(String, String)>::new(),
        )]);
        assert!(config.is_empty());
    }

    #[test]
    fn test_clones_are_independent() {
        let original =
            InstrumentConfig::from_options(&[InstrumentOption::attributes([("k", "v")])]);
        let mut copy = original.clone();
        copy.attributes.insert("k".to_string(), "mutated".to_string());
        copy.description.push_str("mutated");

        assert_eq!(original.attributes["k"], "v");
        assert!(original.description.is_empty());
    }
}
