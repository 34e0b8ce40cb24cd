//! Recorder installation.

use {anyhow::Result, tracing::info};

/// Renders the collected metrics for the `/metrics` route.
#[derive(Clone)]
pub struct MetricsHandle {
    #[cfg(feature = "prometheus")]
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsHandle {
    /// Prometheus text format, or an empty string without the exporter.
    #[must_use]
    pub fn render(&self) -> String {
        #[cfg(feature = "prometheus")]
        {
            self.prometheus_handle.render()
        }
        #[cfg(not(feature = "prometheus"))]
        {
            String::new()
        }
    }
}

/// Install the global recorder. Call once at startup.
///
/// Returns `None` when collection is disabled, leaving the facade a no-op.
pub fn init_metrics(enabled: bool) -> Result<Option<MetricsHandle>> {
    if !enabled {
        info!("metrics collection is disabled");
        return Ok(None);
    }

    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(crate::llm::COMPLETION_DURATION_SECONDS.to_string()),
                &crate::buckets::LLM_DURATION,
            )?
            .install_recorder()?;
        info!("prometheus metrics recorder installed");
        Ok(Some(MetricsHandle {
            prometheus_handle: handle,
        }))
    }

    #[cfg(not(feature = "prometheus"))]
    {
        info!("no metrics exporter compiled in");
        Ok(Some(MetricsHandle {}))
    }
}
