use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub estimates_total: IntCounterVec,
    pub estimate_latency_seconds: HistogramVec,
    pub lifecycle_transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let estimates_total = IntCounterVec::new(
            Opts::new("estimates_total", "Delivery estimates by outcome"),
            &["outcome"],
        )
        .expect("valid estimates_total metric");

        let estimate_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "estimate_latency_seconds",
                "Latency of delivery estimation in seconds",
            ),
            &["outcome"],
        )
        .expect("valid estimate_latency_seconds metric");

        let lifecycle_transitions_total = IntCounterVec::new(
            Opts::new(
                "lifecycle_transitions_total",
                "Logistics request operations by transition and outcome",
            ),
            &["transition", "outcome"],
        )
        .expect("valid lifecycle_transitions_total metric");

        registry
            .register(Box::new(estimates_total.clone()))
            .expect("register estimates_total");
        registry
            .register(Box::new(estimate_latency_seconds.clone()))
            .expect("register estimate_latency_seconds");
        registry
            .register(Box::new(lifecycle_transitions_total.clone()))
            .expect("register lifecycle_transitions_total");

        Self {
            registry,
            estimates_total,
            estimate_latency_seconds,
            lifecycle_transitions_total,
        }
    }

    pub fn observe_estimate(&self, valid: bool, elapsed_seconds: f64) {
        let outcome = if valid { "valid" } else { "invalid" };
        self.estimates_total.with_label_values(&[outcome]).inc();
        self.estimate_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
