use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sentiment_model: String,
    pub summarization_model: String,
    pub max_input_length: usize,
    pub max_summary_input_length: usize,
    pub max_summary_length: usize,
    pub min_summary_length: usize,
    pub debug: bool,
    pub bind_addr: String,
    pub inference_url: Url,
    pub inference_api_token: Option<String>,
    pub inference_timeout: Duration,
    pub poison_failed_pipelines: bool,
    pub warm_up_models: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inference_url = lookup("INFERENCE_URL")
            .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string());
        let inference_url =
            Url::parse(&inference_url).map_err(|e| format!("INFERENCE_URL: {}", e))?;

        let config = Self {
            sentiment_model: lookup("SENTIMENT_MODEL")
                .unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
            summarization_model: lookup("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string()),
            max_input_length: positive(&lookup, "MAX_INPUT_LENGTH", 1000)?,
            max_summary_input_length: positive(&lookup, "MAX_SUMMARY_INPUT_LENGTH", 10_000)?,
            max_summary_length: positive(&lookup, "MAX_SUMMARY_LENGTH", 100)?,
            min_summary_length: positive(&lookup, "MIN_SUMMARY_LENGTH", 30)?,
            debug: flag(&lookup, "FLASK_DEBUG") || flag(&lookup, "DEBUG"),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            inference_url,
            inference_api_token: lookup("INFERENCE_API_TOKEN").filter(|t| !t.trim().is_empty()),
            inference_timeout: Duration::from_secs(positive(
                &lookup,
                "INFERENCE_TIMEOUT_SECS",
                120,
            )? as u64),
            poison_failed_pipelines: flag(&lookup, "POISON_FAILED_PIPELINES"),
            warm_up_models: flag(&lookup, "WARM_UP_MODELS"),
        };

        if config.min_summary_length > config.max_summary_length {
            return Err(format!(
                "MIN_SUMMARY_LENGTH: {} exceeds MAX_SUMMARY_LENGTH {}",
                config.min_summary_length, config.max_summary_length
            ));
        }

        Ok(config)
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize, String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(0) => Err(format!("{}: must be greater than zero", key)),
            Ok(value) => Ok(value),
            Err(e) => Err(format!("{}: {}", key, e)),
        },
    }
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
