//! HTTP backend for the inference pipelines
//!
//! Talks to a Hugging Face-compatible inference server: models are addressed
//! as `{base}/models/{model_id}` and take `{"inputs": ..., "parameters": ...}`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use super::pipeline::{Classification, PipelineLoader, SentimentPipeline, SummaryPipeline};
use crate::core::config::AppConfig;
use crate::core::models::{PipelineKind, SummaryParams};
use crate::errors::InferenceError;

const MAX_RETRIES: usize = 3;

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct SummaryText {
    summary_text: String,
}

/// Shared HTTP client for all model calls.
pub struct InferenceClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl InferenceClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .timeout(config.inference_timeout)
            .build()
            .map_err(|e| InferenceError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.inference_url.as_str().trim_end_matches('/').to_string(),
            api_token: config.inference_api_token.clone(),
        })
    }

    #[must_use]
    pub fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.base_url, model_id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Checks that the model endpoint answers before a pipeline is handed out.
    async fn probe(&self, kind: PipelineKind, model_id: &str) -> Result<(), InferenceError> {
        let url = self.model_url(model_id);
        info!(%kind, model = %model_id, url = %url, "Loading inference pipeline");

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable {
                kind,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Unavailable {
                kind,
                reason: format!("model endpoint answered {status}"),
            });
        }

        Ok(())
    }

    async fn post_once(&self, url: &str, body: &Value) -> Result<Value, InferenceError> {
        let response = self.authorize(self.http.post(url)).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(if is_retryable_status(status) {
                InferenceError::Http(format!("status {status}: {error_text}"))
            } else {
                InferenceError::Model(format!("status {status}: {error_text}"))
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POSTs with exponential backoff for connection failures, 429 and 5xx.
    async fn post_with_retry(&self, url: &str, body: &Value) -> Result<Value, InferenceError> {
        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(MAX_RETRIES);

        RetryIf::spawn(
            strategy,
            || self.post_once(url, body),
            |e: &InferenceError| {
                let transient = matches!(e, InferenceError::Http(_));
                if transient {
                    warn!(error = %e, "Transient inference failure, retrying");
                }
                transient
            },
        )
        .await
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Picks the highest-scoring label from either response shape.
pub fn parse_classification(raw: Value) -> Result<Classification, InferenceError> {
    let candidates = match serde_json::from_value::<ClassifyResponse>(raw)? {
        ClassifyResponse::Nested(outer) => outer.into_iter().flatten().collect::<Vec<_>>(),
        ClassifyResponse::Flat(flat) => flat,
    };

    let best = candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| InferenceError::Parse("classifier returned no labels".to_string()))?;

    if !best.score.is_finite() || !(0.0..=1.0).contains(&best.score) {
        return Err(InferenceError::Parse(format!(
            "score {} is outside [0, 1]",
            best.score
        )));
    }

    Ok(Classification {
        label: best.label,
        score: best.score,
    })
}

pub fn parse_summary(raw: Value) -> Result<String, InferenceError> {
    serde_json::from_value::<Vec<SummaryText>>(raw)?
        .into_iter()
        .next()
        .map(|s| s.summary_text)
        .ok_or_else(|| InferenceError::Parse("summarizer returned no summary".to_string()))
}

pub struct HttpSentimentPipeline {
    client: Arc<InferenceClient>,
    url: String,
}

#[async_trait]
impl SentimentPipeline for HttpSentimentPipeline {
    async fn classify(&self, text: &str) -> Result<Classification, InferenceError> {
        #[cfg(feature = "debug-logs")]
        debug!("Classifying text:\n{}", text);

        #[cfg(not(feature = "debug-logs"))]
        debug!(chars = text.chars().count(), "Classifying text");

        let raw = self
            .client
            .post_with_retry(&self.url, &json!({ "inputs": text }))
            .await?;
        parse_classification(raw)
    }
}

pub struct HttpSummaryPipeline {
    client: Arc<InferenceClient>,
    url: String,
}

#[async_trait]
impl SummaryPipeline for HttpSummaryPipeline {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, InferenceError> {
        #[cfg(feature = "debug-logs")]
        debug!("Summarizing text:\n{}", text);

        #[cfg(not(feature = "debug-logs"))]
        debug!(
            chars = text.chars().count(),
            max_length = params.max_length,
            min_length = params.min_length,
            "Summarizing text"
        );

        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": params.max_length,
                "min_length": params.min_length,
                "do_sample": false
            }
        });
        let raw = self.client.post_with_retry(&self.url, &body).await?;
        parse_summary(raw)
    }
}

/// Builds HTTP-backed pipelines once their model endpoint is reachable.
pub struct HttpPipelineLoader {
    client: Arc<InferenceClient>,
}

impl HttpPipelineLoader {
    #[must_use]
    pub fn new(client: Arc<InferenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PipelineLoader for HttpPipelineLoader {
    async fn load_sentiment(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn SentimentPipeline>, InferenceError> {
        self.client.probe(PipelineKind::Sentiment, model_id).await?;
        Ok(Arc::new(HttpSentimentPipeline {
            client: Arc::clone(&self.client),
            url: self.client.model_url(model_id),
        }))
    }

    async fn load_summarizer(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn SummaryPipeline>, InferenceError> {
        self.client
            .probe(PipelineKind::Summarization, model_id)
            .await?;
        Ok(Arc::new(HttpSummaryPipeline {
            client: Arc::clone(&self.client),
            url: self.client.model_url(model_id),
        }))
    }
}
