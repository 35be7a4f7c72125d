//! `POST /sentiment`

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use tracing::debug;

use super::handler::guarded;
use super::parsing::{field, parse_payload};
use super::response::{self, Envelope};
use super::state::AppState;
use crate::errors::{ApiError, ValidationError};
use crate::utils::text::truncate_text;
use crate::validation::validate_text;

const LOG_PREVIEW_CHARS: usize = 80;

pub async fn handle_sentiment(State(state): State<AppState>, body: Bytes) -> Response {
    guarded("sentiment", analyze_sentiment(state, body)).await
}

/// Presence of `text`, then emptiness/length, then the classifier.
async fn analyze_sentiment(state: AppState, body: Bytes) -> Result<Envelope, ApiError> {
    let payload = parse_payload(&body);
    let value = field(payload.as_ref(), "text").ok_or(ValidationError::MissingField("text"))?;
    let text = validate_text(Some(value), state.config.max_input_length)?;

    debug!(preview = %truncate_text(text, LOG_PREVIEW_CHARS), "Classifying sentiment");

    let result = state
        .gateway
        .classify_sentiment(text)
        .await
        .map_err(|e| ApiError::from_inference("Sentiment analysis", e))?;

    response::ok(&result, None)
}
