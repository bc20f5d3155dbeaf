use crate::{
    Counter, Histogram, InstrumentConfig, InstrumentKind, InstrumentOption, UpDownCounter,
};

/// A trait for obtaining instruments by name.
///
/// Implementations must be safe for concurrent use, and must return the same instrument for every
/// request naming the same kind and name.
pub trait Provider {
    /// Gets or creates a counter.
    ///
    /// `options` only take effect if this call is the one that creates the counter.
    fn counter(&self, name: &str, options: &[InstrumentOption]) -> Counter;

    /// Gets or creates an up/down counter.
    ///
    /// `options` only take effect if this call is the one that creates the counter.
    fn up_down_counter(&self, name: &str, options: &[InstrumentOption]) -> UpDownCounter;

    /// Gets or creates a histogram.
    ///
    /// `options` only take effect if this call is the one that creates the histogram.
    fn histogram(&self, name: &str, options: &[InstrumentOption]) -> Histogram;
}

/// A trait for reading instruments back together with their metadata.
///
/// Configurations returned by an `Inspector` are copies: mutating them never affects what the
/// inspector holds.
pub trait Inspector {
    /// Gets a counter and its configuration.
    fn counter_with_meta(&self, name: &str) -> Inspection<Counter>;

    /// Gets an up/down counter and its configuration.
    fn up_down_counter_with_meta(&self, name: &str) -> Inspection<UpDownCounter>;

    /// Gets a histogram and its configuration.
    fn histogram_with_meta(&self, name: &str) -> Inspection<Histogram>;

    /// Lists every known instrument with a copy of its configuration.
    fn list_metadata(&self) -> Vec<InstrumentEntry>;
}

// Blanket implementations.
macro_rules! impl_provider {
    ($inner_ty:ident, $ptr_ty:ty) => {
        impl<$inner_ty> $crate::Provider for $ptr_ty
        where
            $inner_ty: $crate::Provider + ?Sized,
        {
            fn counter(
                &self,
                name: &str,
                options: &[$crate::InstrumentOption],
            ) -> $crate::Counter {
                std::ops::Deref::deref(self).counter(name, options)
            }

            fn up_down_counter(
                &self,
                name: &str,
                options: &[$crate::InstrumentOption],
            ) -> $crate::UpDownCounter {
                std::ops::Deref::deref(self).up_down_counter(name, options)
            }

            fn histogram(
                &self,
                name: &str,
                options: &[$crate::InstrumentOption],
            ) -> $crate::Histogram {
                std::ops::Deref::deref(self).histogram(name, options)
            }
        }
    };
}

impl_provider!(T, &T);
impl_provider!(T, std::boxed::Box<T>);
impl_provider!(T, std::sync::Arc<T>);

/// The result of inspecting an instrument.
#[derive(Clone, Debug)]
pub struct Inspection<H> {
    /// The instrument, if it exists.
    pub instrument: Option<H>,
    /// A copy of the instrument's configuration, or an empty configuration if unavailable.
    pub config: InstrumentConfig,
    /// Whether or not both the instrument and its configuration were found.
    pub found: bool,
}

impl<H> Inspection<H> {
    /// An inspection of an instrument that does not exist.
    pub fn not_found() -> Self {
        Self { instrument: None, config: InstrumentConfig::default(), found: false }
    }

    /// An inspection of an instrument and its configuration.
    pub fn found(instrument: H, config: InstrumentConfig) -> Self {
        Self { instrument: Some(instrument), config, found: true }
    }

    /// Takes the individual pieces of this `Inspection`.
    pub fn into_parts(self) -> (Option<H>, InstrumentConfig, bool) {
        (self.instrument, self.config, self.found)
    }
}

/// A single entry returned by [`Inspector::list_metadata`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentEntry {
    /// Instrument kind.
    pub kind: InstrumentKind,
    /// Instrument name.
    pub name: String,
    /// A copy of the instrument's configuration.
    pub config: InstrumentConfig,
}

/// A no-op provider.
///
/// Hands out handles that discard every update. Useful when instrumentation must be wired up but
/// nothing should be collected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProvider;

impl Provider for NoopProvider {
    fn counter(&self, _name: &str, _options: &[InstrumentOption]) -> Counter {
        Counter::noop()
    }

    fn up_down_counter(&self, _name: &str, _options: &[InstrumentOption]) -> UpDownCounter {
        UpDownCounter::noop()
    }

    fn histogram(&self, _name: &str, _options: &[InstrumentOption]) -> Histogram {
        Histogram::noop()
    }
}
