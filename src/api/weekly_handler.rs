//! `POST /weekly-summary`

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::handler::guarded;
use super::parsing::{field, parse_payload};
use super::response::{self, Envelope};
use super::state::AppState;
use crate::aggregate::{check_combined_length, combine_texts, group_by_date};
use crate::core::models::{DailySummary, SummaryParams, WeeklySummary};
use crate::errors::{ApiError, ValidationError};
use crate::validation::parse_feedback_records;

pub async fn handle_weekly_summary(State(state): State<AppState>, body: Bytes) -> Response {
    guarded("weekly_summary", weekly_summary(state, body)).await
}

/// Validates every record and every day's combined length before the first
/// model call, so a bad request never costs an inference.
async fn weekly_summary(state: AppState, body: Bytes) -> Result<Envelope, ApiError> {
    let payload = parse_payload(&body);
    let feedbacks =
        field(payload.as_ref(), "feedbacks").ok_or(ValidationError::MissingField("feedbacks"))?;
    let items = parse_feedback_records(Some(feedbacks))?;

    let mut days = Vec::new();
    for bundle in group_by_date(&items) {
        let combined = combine_texts(&bundle.texts);
        check_combined_length(
            &combined,
            state.config.max_summary_input_length,
            Some(&bundle),
        )?;
        days.push((bundle, combined));
    }

    let mut summaries = if days.is_empty() {
        Vec::new()
    } else {
        let summarizer = state
            .gateway
            .summary_pipeline()
            .await
            .map_err(|e| ApiError::from_inference("Summarization", e))?;
        let params = SummaryParams {
            max_length: state.config.max_summary_length,
            min_length: state.config.min_summary_length,
        };

        try_join_all(days.into_iter().map(|(bundle, combined)| {
            let summarizer = summarizer.clone();
            async move {
                let date = bundle.date_key();
                debug!(date = %date, feedbacks = bundle.texts.len(), "Summarizing day");
                let summary = summarizer
                    .summarize(&combined, params)
                    .await
                    .map_err(|e| ApiError::from_inference("Summarization", e))?;
                Ok::<_, ApiError>(DailySummary {
                    date,
                    summary,
                    feedback_count: bundle.texts.len(),
                })
            }
        }))
        .await?
    };

    summaries.sort_by(|a, b| a.date.cmp(&b.date));
    info!(days = summaries.len(), "Weekly summary generated");

    response::ok(
        &WeeklySummary {
            summaries,
            model: state.gateway.summarization_model().to_string(),
        },
        None,
    )
}
