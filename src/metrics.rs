//! Prometheus metrics for the HTTP surface and the evaluation loop

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub signal_evaluations_total: IntCounter,
    pub signal_evaluation_failures_total: IntCounter,
    pub signal_evaluation_duration_seconds: Histogram,
    pub signal_transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = Gauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let signal_evaluations_total = IntCounter::new(
            "signal_evaluations_total",
            "Number of completed ticker evaluations",
        )?;
        let signal_evaluation_failures_total = IntCounter::new(
            "signal_evaluation_failures_total",
            "Number of ticker evaluations skipped because market data failed",
        )?;
        let signal_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_evaluation_duration_seconds",
                "Duration of a single ticker evaluation in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        let signal_transitions_total = IntCounterVec::new(
            Opts::new("signal_transitions_total", "Number of signal transitions"),
            &["ticker", "signal"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(signal_evaluation_failures_total.clone()))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(signal_transitions_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            signal_evaluations_total,
            signal_evaluation_failures_total,
            signal_evaluation_duration_seconds,
            signal_transitions_total,
        })
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
