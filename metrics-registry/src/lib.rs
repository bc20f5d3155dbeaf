//! A lazily populated registry of named instruments.
//!
//! `metrics-registry` hands out counters, up/down counters and histograms by name. Instruments are
//! created on first use, each together with a configuration (description, unit and attributes)
//! taken from the options passed by whichever caller created it.
//!
//! # Overview
//!
//! ## Instrument kinds
//!
//! - **Counters** accumulate signed 64-bit deltas. They are intended for values that only grow,
//!   but negative deltas are accepted as-is.
//! - **Up/down counters** accumulate signed 64-bit deltas that are expected to go both ways, such
//!   as the number of in-flight requests.
//! - **Histograms** record floating-point observations and summarize them as count, sum, minimum,
//!   maximum and mean.
//!
//! Instruments of different kinds live in separate namespaces: a counter and a histogram may share
//! a name without conflict.
//!
//! ## Guarantees
//!
//! For every (kind, name) pair, exactly one instrument is ever created, no matter how many threads
//! race to create it. Every caller receives a handle to that same instrument, and the configuration
//! stored for it is the one computed by the caller that won the race. Options passed by every other
//! caller are silently discarded.
//!
//! An instrument's configuration is always stored before the instrument itself becomes visible, and
//! neither is ever replaced or removed afterwards.
//!
//! ## Inspection
//!
//! The `*_with_meta` methods read an instrument back together with a copy of its configuration,
//! taken under the same per-key lock used for creation. [`Registry::list_metadata`] walks every
//! stored configuration without taking per-key locks and is best-effort under concurrent creation.
//!
//! # Usage
//!
//! ```rust
//! use metrics_registry::{InstrumentOption, Registry};
//!
//! let registry = Registry::new();
//!
//! let requests = registry.counter(
//!     "http_requests",
//!     &[
//!         InstrumentOption::description("Number of HTTP requests handled."),
//!         InstrumentOption::unit("1"),
//!         InstrumentOption::attributes([("service", "api")]),
//!     ],
//! );
//! requests.add(1);
//!
//! let latency = registry.histogram("http_latency", &[InstrumentOption::unit("s")]);
//! latency.record(0.25);
//!
//! let inspection = registry.counter_with_meta("http_requests");
//! assert!(inspection.found);
//! assert_eq!(inspection.config.description, "Number of HTTP requests handled.");
//! assert_eq!(inspection.instrument.map(|c| c.value()), Some(1));
//! ```
//!
//! # Invariant violations
//!
//! Internal states that should be impossible, such as an instrument without stored metadata, are
//! reported according to the registry's [`Strictness`]. Strict registries panic immediately, which
//! suits tests and debug builds. Lenient registries log through a [`LogSink`], at most
//! [`MAX_REPORTS_PER_VIOLATION`] times per violation, and carry on.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod builder;
pub use self::builder::RegistryBuilder;

mod config;
pub use self::config::{Attributes, InstrumentConfig, InstrumentOption};

mod handles;
pub use self::handles::{Counter, Histogram, UpDownCounter};

pub mod instruments;
pub use self::instruments::HistogramSnapshot;

mod invariant;
pub use self::invariant::{
    InvariantMonitor, InvariantViolation, Strictness, MAX_REPORTS_PER_VIOLATION,
};

mod key;
pub use self::key::InstrumentKey;

mod kind;
pub use self::kind::InstrumentKind;

mod locks;
pub use self::locks::{KeyLock, LockTable};

mod metadata;
pub use self::metadata::MetadataStore;

mod provider;
pub use self::provider::{Inspection, Inspector, InstrumentEntry, NoopProvider, Provider};

mod registry;
pub use self::registry::Registry;

mod sink;
pub use self::sink::{LogSink, NoopSink, TracingSink};
