//! API route handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::orchestrator::{self, PredictionResponse};
use crate::state::AppState;
use crate::validation;

/// Liveness report: process is up, plus when a model last fitted
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "model": "prophet",
        "last_trained": state.liveness.last_trained().map(|at| at.to_rfc3339()),
    }))
}

/// BYOM prediction endpoint
///
/// The body is taken as raw bytes so an absent or unparseable payload
/// reaches the validator as "no body" instead of being rejected by the
/// extractor with a different shape.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();
    let request = validation::validate(parsed.as_ref())?;

    tracing::info!(
        horizon_seconds = request.horizon_seconds,
        step_seconds = request.step_seconds,
        features = request.features.len(),
        "prediction request"
    );

    let response = orchestrator::run(state.forecaster.as_ref(), &state.liveness, &request)?;

    tracing::info!(count = response.values.len(), "returning predictions");
    Ok(Json(response))
}
