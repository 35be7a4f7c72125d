//! Uniform response envelope for every JSON endpoint.
//!
//! Success: `{ "success": true, "timestamp", "data", "message"? }`
//! Failure: `{ "success": false, "timestamp", "error" }`

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// UTC, ISO-8601, taken when the envelope is built.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Wraps `data` in a success envelope.
///
/// # Errors
///
/// Returns `ApiError::Internal` if `data` cannot be serialised.
pub fn ok<T: Serialize>(data: &T, message: Option<&str>) -> Result<Envelope, ApiError> {
    let data = serde_json::to_value(data)
        .map_err(|e| ApiError::Internal(format!("Failed to serialise response: {e}")))?;

    Ok(Envelope {
        success: true,
        timestamp: timestamp(),
        data: Some(data),
        error: None,
        message: message.map(ToString::to_string),
    })
}

/// Builds a failure envelope paired with the status the boundary should use.
#[must_use]
pub fn err(message: &str, status_code: u16) -> (StatusCode, Envelope) {
    let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let envelope = Envelope {
        success: false,
        timestamp: timestamp(),
        data: None,
        error: Some(message.to_string()),
        message: None,
    };
    (status, envelope)
}

#[must_use]
pub fn respond(status: StatusCode, envelope: Envelope) -> Response {
    (status, Json(envelope)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = err(&self.client_message(), self.status_code());
        respond(status, envelope)
    }
}
