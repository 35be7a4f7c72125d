use std::error::Error;

use feedback_insights::core::models::PipelineKind;
use feedback_insights::errors::{ApiError, InferenceError, ValidationError};

#[test]
fn test_errors_implement_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    assert_error(&ValidationError::EmptyList);
    assert_error(&InferenceError::Model("boom".to_string()));
    assert_error(&ApiError::Internal("boom".to_string()));
}

#[test]
fn test_validation_error_display() {
    assert_eq!(
        ValidationError::MissingField("text").to_string(),
        "'text' field is required"
    );
    assert_eq!(
        ValidationError::TooLong { max: 1000 }.to_string(),
        "Input exceeds maximum length of 1000 characters"
    );
    assert_eq!(
        ValidationError::ElementMissingField {
            index: 3,
            field: "date"
        }
        .to_string(),
        "Feedback at index 3 is missing 'date' field"
    );
    assert_eq!(
        ValidationError::CombinedDailyTextTooLong {
            date: "2024-01-02".to_string(),
            max: 10
        }
        .to_string(),
        "Combined feedback for 2024-01-02 exceeds maximum length of 10 characters"
    );
}

#[test]
fn test_status_codes() {
    assert_eq!(ApiError::from(ValidationError::NotAList).status_code(), 400);
    assert_eq!(
        ApiError::ServiceUnavailable {
            kind: PipelineKind::Sentiment,
            reason: "down".to_string()
        }
        .status_code(),
        503
    );
    assert_eq!(
        ApiError::from_inference("Summarization", InferenceError::Parse("bad".to_string()))
            .status_code(),
        500
    );
    assert_eq!(ApiError::Internal("x".to_string()).status_code(), 500);
}

#[test]
fn test_unavailable_inference_becomes_service_unavailable() {
    let error = ApiError::from_inference(
        "Sentiment analysis",
        InferenceError::Unavailable {
            kind: PipelineKind::Sentiment,
            reason: "connection refused".to_string(),
        },
    );

    match &error {
        ApiError::ServiceUnavailable { kind, .. } => assert_eq!(*kind, PipelineKind::Sentiment),
        other => panic!("Unexpected error type: {other:?}"),
    }
    assert_eq!(error.client_message(), "Sentiment model is unavailable");
}

#[test]
fn test_client_message_hides_causes() {
    let error = ApiError::from_inference(
        "Summarization",
        InferenceError::Model("tensor shape mismatch".to_string()),
    );
    assert_eq!(error.client_message(), "Summarization failed");
    // The full cause is still available for logging.
    assert!(error.to_string().contains("tensor shape mismatch"));

    let internal = ApiError::Internal("stack trace here".to_string());
    assert_eq!(internal.client_message(), "Internal server error");
}

#[test]
fn test_inference_error_from_conversions() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    match InferenceError::from(parse_err) {
        InferenceError::Parse(_) => {}
        other => panic!("Unexpected error type: {other:?}"),
    }

    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> InferenceError {
        InferenceError::from(err)
    }

    let api: ApiError = InferenceError::Http("reset".to_string()).into();
    assert_eq!(api.client_message(), "Inference failed");
}
