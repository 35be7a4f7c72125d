//! `POST /summarize-feedback`

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use serde_json::Value;
use tracing::debug;

use super::handler::guarded;
use super::parsing::parse_payload;
use super::response::{self, Envelope};
use super::state::AppState;
use crate::aggregate::{check_combined_length, combine_texts};
use crate::core::models::{SummaryParams, SummaryResult};
use crate::errors::{ApiError, ValidationError};
use crate::utils::text::text_stats;
use crate::validation::{char_len, validate_feedback_list};

/// Fixed length bounds for the combined feedback summary.
pub const FEEDBACK_SUMMARY_PARAMS: SummaryParams = SummaryParams {
    max_length: 100,
    min_length: 30,
};

static EMPTY_LIST: Value = Value::Array(Vec::new());

pub async fn handle_summarize_feedback(State(state): State<AppState>, body: Bytes) -> Response {
    guarded("summarize_feedback", summarize_feedback(state, body)).await
}

/// Availability, payload, list shape, elements, combined length, then the
/// model. The first failing step decides the response.
async fn summarize_feedback(state: AppState, body: Bytes) -> Result<Envelope, ApiError> {
    let summarizer = state
        .gateway
        .summary_pipeline()
        .await
        .map_err(|e| ApiError::from_inference("Summarization", e))?;

    let payload = parse_payload(&body).ok_or(ValidationError::MissingPayload)?;
    let feedbacks = validate_feedback_list(Some(payload.get("feedbacks").unwrap_or(&EMPTY_LIST)))?;

    let combined = combine_texts(&feedbacks);
    check_combined_length(&combined, state.config.max_summary_input_length, None)?;

    debug!(
        feedbacks = feedbacks.len(),
        chars = char_len(&combined),
        "Summarizing combined feedback"
    );

    let summary = summarizer
        .summarize(&combined, FEEDBACK_SUMMARY_PARAMS)
        .await
        .map_err(|e| ApiError::from_inference("Summarization", e))?;

    let result = SummaryResult {
        summary_text: summary,
        model_id: state.gateway.summarization_model().to_string(),
        input_feedback_count: feedbacks.len(),
        input_length: char_len(&combined),
        input_stats: text_stats(&combined),
    };

    response::ok(&result, None)
}
