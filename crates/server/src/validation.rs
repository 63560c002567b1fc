//! Request validation for the BYOM prediction contract
//!
//! Checks run in a fixed order and the first violation wins; nothing is
//! aggregated. Structural checks only: timestamp parsing and value
//! coercion belong to the orchestrator so their failures classify as
//! internal rather than client errors.

use serde_json::Value;
use thiserror::Error;

/// A single violated validation rule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body is required")]
    MissingBody,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("horizonSeconds must be > 0")]
    InvalidHorizon,

    #[error("stepSeconds must be > 0")]
    InvalidStep,

    #[error("stepSeconds cannot exceed horizonSeconds")]
    StepExceedsHorizon,

    #[error("features must contain at least 2 points for Prophet")]
    InsufficientFeatures,

    #[error("feature[{index}] missing required field: {field}")]
    MissingFeatureField { index: usize, field: &'static str },
}

/// A request that passed every validation rule. Feature entries keep
/// their raw JSON shape; the orchestrator coerces them.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub horizon_seconds: i64,
    pub step_seconds: i64,
    pub features: Vec<Value>,
}

const REQUIRED_FIELDS: [&str; 3] = ["horizonSeconds", "stepSeconds", "features"];

/// Validate a raw JSON body against the BYOM contract
pub fn validate(body: Option<&Value>) -> Result<PredictionRequest, ValidationError> {
    let object = body
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingBody)?;

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let horizon_seconds =
        coerce_int(&object["horizonSeconds"]).ok_or(ValidationError::InvalidHorizon)?;
    if horizon_seconds <= 0 {
        return Err(ValidationError::InvalidHorizon);
    }

    let step_seconds = coerce_int(&object["stepSeconds"]).ok_or(ValidationError::InvalidStep)?;
    if step_seconds <= 0 {
        return Err(ValidationError::InvalidStep);
    }
    if step_seconds > horizon_seconds {
        return Err(ValidationError::StepExceedsHorizon);
    }

    // A non-array features field has no usable entries
    let features = object["features"].as_array().cloned().unwrap_or_default();
    if features.len() < 2 {
        return Err(ValidationError::InsufficientFeatures);
    }

    for (index, feature) in features.iter().enumerate() {
        let entry = feature.as_object();
        for field in ["ts", "value"] {
            let present = entry.map(|e| e.contains_key(field)).unwrap_or(false);
            if !present {
                return Err(ValidationError::MissingFeatureField { index, field });
            }
        }
    }

    Ok(PredictionRequest {
        horizon_seconds,
        step_seconds,
        features,
    })
}

/// Best-effort integer coercion: JSON integers, truncated floats, and
/// numeric strings all pass.
fn coerce_int(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    if let Some(f) = value.as_f64() {
        if f.is_finite() {
            return Some(f.trunc() as i64);
        }
        return None;
    }
    if let Some(s) = value.as_str() {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Some(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Some(f.trunc() as i64);
            }
        }
    }
    None
}
