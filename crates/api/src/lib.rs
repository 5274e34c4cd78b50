//! Churn Prediction API Server
//!
//! HTTP front end for the bank and telecom churn models.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use feature_engine::Domain;
use inference_engine::PipelineSet;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod telemetry;

use config::{AppConfig, LoggingConfig};
use rate_limit::{create_governor_config, RateLimitConfig};

/// Application state shared across handlers; read-only after startup
pub struct AppState {
    /// Loaded model pipelines
    pub pipelines: PipelineSet,
    /// Range validator for decoded records
    pub validator: Validator,
    /// Reject out-of-range records instead of warning
    pub strict_validation: bool,
    /// Prometheus handle when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(pipelines: PipelineSet, validator: Validator, strict_validation: bool) -> Self {
        Self {
            pipelines,
            validator,
            strict_validation,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Load models and install the metrics recorder as configured
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let pipelines = PipelineSet::load(&config.models.bank, &config.models.telecom)?;
        let validator = Validator::new(config.validation.ranges.clone());

        let mut state = Self::new(pipelines, validator, config.validation.strict);
        if config.metrics.enabled {
            state.metrics = Some(telemetry::install_recorder()?);
        }
        Ok(state)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub models: Vec<ModelHealth>,
}

/// Per-domain model status
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub model_type: Domain,
    pub available: bool,
    pub classifier: Option<String>,
    pub scaled: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, rate_limit: &RateLimitConfig) -> anyhow::Result<Router> {
    let mut predictions = Router::new()
        .route("/predict", post(routes::predictions::predict))
        .route("/api/bank-churn-prediction", post(routes::predictions::predict_bank))
        .route(
            "/api/telecom-churn-prediction",
            post(routes::predictions::predict_telecom),
        );

    if let Some(config) = create_governor_config(rate_limit)? {
        info!(
            "Rate limiting predictions: burst {} per peer, one slot every {}s",
            rate_limit.burst_size, rate_limit.per_second
        );
        predictions = predictions.layer(GovernorLayer { config });
    }

    Ok(Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(predictions)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let models: Vec<ModelHealth> = Domain::ALL
        .iter()
        .map(|&domain| match state.pipelines.get(domain) {
            Ok(pipeline) => ModelHealth {
                model_type: domain,
                available: true,
                classifier: Some(pipeline.classifier_name().to_string()),
                scaled: pipeline.is_scaled(),
            },
            Err(_) => ModelHealth {
                model_type: domain,
                available: false,
                classifier: None,
                scaled: false,
            },
        })
        .collect();

    let status = if models.iter().all(|m| m.available) {
        "healthy"
    } else if models.iter().any(|m| m.available) {
        "degraded"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        models,
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.level)
        .map_err(|_| anyhow::anyhow!("invalid log level: {}", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Run the server until it stops
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let app = create_router(state, &config.rate_limit)?;

    let addr = config.bind_addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
