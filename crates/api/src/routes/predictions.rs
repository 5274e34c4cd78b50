//! Prediction Routes

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    Form, Json,
};
use data_validator::ValidationResult;
use feature_engine::{BankCustomerRecord, Domain, FeatureVector, RawRecord, TelecomCustomerRecord};
use inference_engine::ChurnLabel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::telemetry;
use crate::AppState;

/// Customer attributes from either a JSON object or a urlencoded form
#[derive(Debug)]
pub struct RecordPayload(pub RawRecord);

#[async_trait]
impl<S> FromRequest<S> for RecordPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            let record = fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            Ok(Self(record))
        } else {
            let Json(record) = Json::<RawRecord>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(record))
        }
    }
}

/// Response for prediction endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: ChurnLabel,
    pub model_type: Domain,
    pub request_id: String,
    pub latency_ms: f64,
    /// Unix time of the prediction in milliseconds
    pub timestamp_ms: u64,
    /// Out-of-range findings tolerated in lenient mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Predict for the domain named by the body's `model_type`
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<RecordPayload, ApiError>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let RecordPayload(record) = payload.map_err(|e| rejected(None, e))?;
    let domain = record
        .get("model_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .parse::<Domain>()
        .map_err(|e| rejected(None, e.into()))?;

    predict_record(&state, domain, &record)
        .map(Json)
        .map_err(|e| rejected(Some(domain), e))
}

/// Bank churn prediction
pub async fn predict_bank(
    State(state): State<Arc<AppState>>,
    payload: Result<RecordPayload, ApiError>,
) -> Result<Json<PredictionResponse>, ApiError> {
    run_prediction(&state, Domain::Bank, payload)
}

/// Telecom churn prediction
pub async fn predict_telecom(
    State(state): State<Arc<AppState>>,
    payload: Result<RecordPayload, ApiError>,
) -> Result<Json<PredictionResponse>, ApiError> {
    run_prediction(&state, Domain::Telecom, payload)
}

fn run_prediction(
    state: &AppState,
    domain: Domain,
    payload: Result<RecordPayload, ApiError>,
) -> Result<Json<PredictionResponse>, ApiError> {
    payload
        .and_then(|RecordPayload(record)| predict_record(state, domain, &record))
        .map(Json)
        .map_err(|e| rejected(Some(domain), e))
}

/// Count a failed request before it is rendered
fn rejected(domain: Option<Domain>, error: ApiError) -> ApiError {
    telemetry::record_error(domain, error.kind());
    error
}

fn predict_record(
    state: &AppState,
    domain: Domain,
    record: &RawRecord,
) -> Result<PredictionResponse, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let (features, validation) = encode_checked(state, domain, record)?;

    let warnings: Vec<String> = validation.errors.iter().map(ToString::to_string).collect();
    if !validation.valid {
        if state.strict_validation {
            return Err(ApiError::Validation(validation.summary()));
        }
        warn!(
            request_id = %request_id,
            "Out-of-range {} record accepted: {}",
            domain,
            validation.summary()
        );
    }

    let result = state.pipelines.predict(&features)?;
    telemetry::record_prediction(&result);

    info!(
        request_id = %request_id,
        "{} prediction: {} ({}us, scaled={})",
        domain,
        result.prediction.label.as_str(),
        result.latency_us,
        result.scaled
    );

    Ok(PredictionResponse {
        prediction: result.prediction.label,
        model_type: domain,
        request_id,
        latency_ms: result.latency_us as f64 / 1000.0,
        timestamp_ms: result.prediction.timestamp_ms,
        warnings,
    })
}

/// Decode the typed record, range-check it and encode it
fn encode_checked(
    state: &AppState,
    domain: Domain,
    record: &RawRecord,
) -> Result<(FeatureVector, ValidationResult), ApiError> {
    Ok(match domain {
        Domain::Bank => {
            let typed = BankCustomerRecord::from_raw(record)?;
            (typed.encode(), state.validator.validate_bank(&typed))
        }
        Domain::Telecom => {
            let typed = TelecomCustomerRecord::from_raw(record)?;
            (typed.encode(), state.validator.validate_telecom(&typed))
        }
    })
}
