use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::utils::text::TextStats;

/// One dated feedback record, accepted only after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackItem {
    pub text: String,
    pub date: NaiveDate,
}

/// All feedback texts that share one calendar date, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBundle {
    pub date: NaiveDate,
    pub texts: Vec<String>,
}

impl DailyBundle {
    /// The date as `YYYY-MM-DD`, which is also its sort key on the wire.
    #[must_use]
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Sentiment,
    Summarization,
}

impl PipelineKind {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            PipelineKind::Sentiment => "Sentiment",
            PipelineKind::Summarization => "Summarization",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKind::Sentiment => f.write_str("sentiment"),
            PipelineKind::Summarization => f.write_str("summarization"),
        }
    }
}

/// Sentiment classes. Labels a model reports outside the known set are kept
/// verbatim (upper-cased) rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl From<&str> for SentimentLabel {
    fn from(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "POSITIVE" | "POS" => SentimentLabel::Positive,
            "NEGATIVE" | "NEG" => SentimentLabel::Negative,
            "NEUTRAL" | "NEU" => SentimentLabel::Neutral,
            _ => SentimentLabel::Other(upper),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => f.write_str("POSITIVE"),
            SentimentLabel::Negative => f.write_str("NEGATIVE"),
            SentimentLabel::Neutral => f.write_str("NEUTRAL"),
            SentimentLabel::Other(label) => f.write_str(label),
        }
    }
}

impl Serialize for SentimentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f32,
    #[serde(rename = "model")]
    pub model_id: String,
}

/// Result of summarising the flat `/summarize-feedback` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    #[serde(rename = "summary")]
    pub summary_text: String,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "input_feedbacks")]
    pub input_feedback_count: usize,
    pub input_length: usize,
    pub input_stats: TextStats,
}

/// One entry of the `/weekly-summary` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub summary: String,
    pub feedback_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySummary {
    pub summaries: Vec<DailySummary>,
    pub model: String,
}

/// Parameters forwarded to the summarisation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryParams {
    pub max_length: usize,
    pub min_length: usize,
}
