//! Contract with the pretrained models.
//!
//! The models themselves are opaque: a pipeline takes text and returns a
//! label/score pair or a summary. A `PipelineLoader` builds the expensive
//! handles; the gateway decides when.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::models::SummaryParams;
use crate::errors::InferenceError;

/// Raw classifier output before it is tagged with a model id.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

#[async_trait]
pub trait SentimentPipeline: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, InferenceError>;
}

#[async_trait]
pub trait SummaryPipeline: Send + Sync {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, InferenceError>;
}

#[async_trait]
pub trait PipelineLoader: Send + Sync {
    async fn load_sentiment(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn SentimentPipeline>, InferenceError>;

    async fn load_summarizer(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn SummaryPipeline>, InferenceError>;
}
