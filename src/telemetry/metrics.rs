//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Market data provider operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOp {
    /// Latest close lookup
    LatestClose,
    /// Expiration list lookup
    Expirations,
    /// Call chain lookup
    CallChain,
}

impl ProviderOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderOp::LatestClose => "latest_close",
            ProviderOp::Expirations => "expirations",
            ProviderOp::CallChain => "call_chain",
        }
    }
}

/// Install the Prometheus HTTP listener on the given port
pub fn init_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;
    tracing::info!(%addr, "Prometheus metrics listener started");
    Ok(())
}

/// Record a provider request and its latency
pub fn record_provider_request(op: ProviderOp, duration: Duration, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("ratehedge_provider_requests_total", "op" => op.as_str(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("ratehedge_provider_latency_ms", "op" => op.as_str())
        .record(duration.as_secs_f64() * 1000.0);

    tracing::debug!(
        op = op.as_str(),
        value_ms = duration.as_millis(),
        success,
        "Provider request"
    );
}

/// Count a rate log upsert
pub fn record_log_upsert(log_name: &'static str, rows: usize) {
    metrics::counter!("ratehedge_log_upserts_total", "log" => log_name).increment(1);
    metrics::gauge!("ratehedge_log_rows", "log" => log_name).set(rows as f64);
}

/// Count log rows dropped while loading
pub fn record_dropped_rows(log_name: &'static str, dropped: usize) {
    if dropped == 0 {
        return;
    }
    metrics::counter!("ratehedge_log_dropped_rows_total", "log" => log_name)
        .increment(dropped as u64);
}
