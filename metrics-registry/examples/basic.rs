use metrics_registry::{InstrumentOption, Registry, Strictness, TracingSink};
use tracing::info;

fn main() {
    tracing_subscriber::fmt().with_ansi(true).with_level(true).init();

    let registry = Registry::builder()
        .with_strictness(Strictness::from_build())
        .with_sink(TracingSink)
        .build();

    let requests = registry.counter(
        "http_requests",
        &[
            InstrumentOption::description("Number of HTTP requests handled."),
            InstrumentOption::unit("1"),
            InstrumentOption::attributes([("service", "api")]),
        ],
    );
    let inflight = registry.up_down_counter("http_inflight", &[]);
    let latency = registry.histogram("http_latency", &[InstrumentOption::unit("s")]);

    for latency_ms in [12u32, 48, 7, 103, 22] {
        inflight.add(1);
        requests.add(1);
        latency.record(f64::from(latency_ms) / 1000.0);
        inflight.add(-1);
    }

    // Options passed after creation are ignored.
    registry.counter("http_requests", &[InstrumentOption::description("ignored")]);

    for entry in registry.list_metadata() {
        info!(
            kind = %entry.kind,
            name = %entry.name,
            description = %entry.config.description,
            unit = %entry.config.unit,
            attributes = ?entry.config.attributes,
            "registered instrument"
        );
    }

    if let Some(histogram) = registry.histogram_with_meta("http_latency").instrument {
        let snapshot = histogram.snapshot();
        info!(
            count = snapshot.count,
            mean = snapshot.mean,
            min = ?snapshot.min,
            max = ?snapshot.max,
            "latency summary"
        );
    }
    info!(requests = requests.value(), inflight = inflight.value(), "done");
}
