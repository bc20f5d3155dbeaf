use std::fmt;

use crate::InstrumentKind;

/// A key that identifies an instrument by both its kind and its name.
///
/// Names are compared exactly, so `"requests"` and `"Requests"` are different instruments, and a
/// counter named `"requests"` is a different instrument from a histogram named `"requests"`.
/// Empty names are valid.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct InstrumentKey {
    kind: InstrumentKind,
    name: String,
}

impl InstrumentKey {
    /// Creates a new `InstrumentKey`.
    pub fn new<N>(kind: InstrumentKind, name: N) -> InstrumentKey
    where
        N: Into<String>,
    {
        InstrumentKey { kind, name: name.into() }
    }

    /// Gets the kind of this key.
    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Gets the name of this key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes the individual pieces of this `InstrumentKey`.
    pub fn into_parts(self) -> (InstrumentKind, String) {
        (self.kind, self.name)
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
