//! Metrics sink injected by the host.

/// Counter/gauge sink for orbit-emitted measurements.
///
/// Not capability-gated: emitting a metric reveals nothing about host data.
/// The host wires its real telemetry pipeline here; the default is a no-op.
pub trait MetricsSink: Send + Sync {
    /// Increment a counter.
    fn incr(&self, name: &str, value: u64);

    /// Record a gauge value.
    fn gauge(&self, name: &str, value: f64);
}

/// Sink that discards every measurement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn incr(&self, _name: &str, _value: u64) {}

    fn gauge(&self, _name: &str, _value: f64) {}
}
