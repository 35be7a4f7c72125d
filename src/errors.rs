use thiserror::Error;

use crate::core::models::PipelineKind;

/// Client-fixable request problems. Every variant names the field, index or
/// date it concerns so the message can be shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No data provided")]
    MissingPayload,

    #[error("'{0}' field is required")]
    MissingField(&'static str),

    #[error("Text must be a non-empty string")]
    EmptyInput,

    #[error("Input exceeds maximum length of {max} characters")]
    TooLong { max: usize },

    #[error("Feedbacks must be a list")]
    NotAList,

    #[error("Feedback list is empty")]
    EmptyList,

    #[error("Feedback at index {index} is not a string")]
    ElementNotString { index: usize },

    #[error("Feedback at index {index} must be an object with 'text' and 'date' fields")]
    ElementNotObject { index: usize },

    #[error("Feedback at index {index} is missing '{field}' field")]
    ElementMissingField { index: usize, field: &'static str },

    #[error("Feedback at index {index}: 'text' must be a non-empty string")]
    ElementEmptyText { index: usize },

    #[error("Invalid date format at index {index}. Use YYYY-MM-DD.")]
    ElementInvalidDate { index: usize },

    #[error("Combined feedback too long (max {max} characters)")]
    CombinedTextTooLong { max: usize },

    #[error("Combined feedback for {date} exceeds maximum length of {max} characters")]
    CombinedDailyTextTooLong { date: String, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("'{0}' is not a valid YYYY-MM-DD date")]
    InvalidDateFormat(String),
}

/// Failures raised by the inference backend or the gateway in front of it.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("{kind} pipeline unavailable: {reason}")]
    Unavailable { kind: PipelineKind, reason: String },

    #[error("Model call failed: {0}")]
    Model(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Failed to parse inference response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(error: reqwest::Error) -> Self {
        InferenceError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(error: serde_json::Error) -> Self {
        InferenceError::Parse(error.to_string())
    }
}

/// Errors as seen at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} model is unavailable: {reason}")]
    ServiceUnavailable { kind: PipelineKind, reason: String },

    #[error("{operation} failed: {cause}")]
    Inference {
        operation: &'static str,
        cause: InferenceError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps an inference failure, keeping availability failures distinct.
    #[must_use]
    pub fn from_inference(operation: &'static str, error: InferenceError) -> Self {
        match error {
            InferenceError::Unavailable { kind, reason } => {
                ApiError::ServiceUnavailable { kind, reason }
            }
            cause => ApiError::Inference { operation, cause },
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::ServiceUnavailable { .. } => 503,
            ApiError::Inference { .. } | ApiError::Internal(_) => 500,
        }
    }

    /// The text returned to clients. Causes stay in the logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::ServiceUnavailable { kind, .. } => {
                format!("{} model is unavailable", kind.display_name())
            }
            ApiError::Inference { operation, .. } => format!("{operation} failed"),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(error: InferenceError) -> Self {
        ApiError::from_inference("Inference", error)
    }
}
