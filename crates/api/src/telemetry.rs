//! Prediction metrics exported to Prometheus

use feature_engine::Domain;
use inference_engine::InferenceResult;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder. Only one recorder may exist
/// per process.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))
}

/// Count a successful prediction and its latency
pub fn record_prediction(result: &InferenceResult) {
    let domain = result.prediction.domain.as_str();
    counter!(
        "churn_predictions_total",
        "domain" => domain,
        "label" => result.prediction.label.as_str()
    )
    .increment(1);
    histogram!("churn_inference_latency_seconds", "domain" => domain)
        .record(result.latency_us as f64 / 1_000_000.0);
}

/// Count a rejected or failed prediction
pub fn record_error(domain: Option<Domain>, kind: &'static str) {
    let domain = domain.map(|d| d.as_str()).unwrap_or("unknown");
    counter!("churn_prediction_errors_total", "domain" => domain, "kind" => kind).increment(1);
}
