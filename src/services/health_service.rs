use crate::config::UpstreamConfig;
use crate::upstream::Backend;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
struct Metrics {
    status: Gauge<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("boxoffice");
        Self {
            status: meter
                .i64_gauge("boxoffice_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    backend: Backend,
    probe_timeout: Duration,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(backend: Backend, config: &UpstreamConfig) -> Self {
        Self { backend, probe_timeout: Duration::from_millis(config.health_timeout_ms), metrics: Metrics::new() }
    }

    /// Checks upstream reachability.
    ///
    /// # Errors
    /// Returns a string describing the failure if the upstream is unreachable.
    pub async fn check_upstream(&self) -> Result<(), String> {
        match timeout(self.probe_timeout, self.backend.ping()).await {
            Ok(Ok(())) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "upstream")]);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "upstream")]);
                Err(format!("Upstream check failed: {e}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "upstream")]);
                Err("Upstream check timed out".to_string())
            }
        }
    }
}
