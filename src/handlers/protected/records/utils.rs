use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Unwrap a JSON body that must be an object of field → value
pub fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::validation_error("Request body must be a JSON object", None)),
    }
}
