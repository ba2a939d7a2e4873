//! Request and response bodies.

use cropsense_core::Stage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::IntErrorKind;

/// POST /predict body.
///
/// Both fields are kept as raw JSON so that missing, null and wrongly typed
/// values can be told apart and reported with the right message.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub crop_type: Option<Value>,
    #[serde(default)]
    pub crop_stage: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictResponse {
    pub status: String,
    pub predicted_diseases: Vec<String>,
}

impl PredictResponse {
    pub fn success(predicted_diseases: Vec<String>) -> Self {
        Self {
            status: "success".to_string(),
            predicted_diseases,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropStagesResponse {
    pub crop_stages: Vec<Stage>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub maize_model_loaded: bool,
    pub wheat_model_loaded: bool,
    pub working_directory: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// A `crop_stage` value that parsed as an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageValue {
    /// Fits the stage code range.
    Code(Stage),
    /// A well-formed integer outside the stage code range, kept as digits.
    /// No encoder can know it.
    OutOfRange(String),
}

/// Coerce a JSON value to a stage the way a lenient integer parse would.
///
/// Accepts integers, finite floats (truncated toward zero), booleans, and
/// strings holding a signed decimal integer with optional surrounding
/// whitespace. Returns `None` for anything else.
pub fn coerce_stage(value: &Value) -> Option<StageValue> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(StageValue::Code(i));
            }
            if n.is_u64() {
                return Some(StageValue::OutOfRange(n.to_string()));
            }
            let f = n.as_f64()?.trunc();
            if !f.is_finite() {
                return None;
            }
            // i64::MIN is exactly representable; i64::MAX is not.
            if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(StageValue::Code(f as i64))
            } else {
                Some(StageValue::OutOfRange(format!("{f:.0}")))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<Stage>() {
                Ok(stage) => Some(StageValue::Code(stage)),
                // Overflow is reported as soon as it happens, so check the
                // rest of the string is digits too.
                Err(err)
                    if matches!(
                        err.kind(),
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                    ) && s
                        .trim_start_matches(['+', '-'])
                        .bytes()
                        .all(|b| b.is_ascii_digit()) =>
                {
                    Some(StageValue::OutOfRange(s.trim_start_matches('+').to_string()))
                }
                Err(_) => None,
            }
        }
        Value::Bool(b) => Some(StageValue::Code(i64::from(*b))),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
