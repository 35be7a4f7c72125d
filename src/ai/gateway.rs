//! Single entry point for every call into the inference pipelines.
//!
//! Each pipeline kind is initialised lazily on first use. Initialisation is
//! single-flight: the first caller starts one load, every concurrent caller
//! awaits that same load and sees the same outcome. A failed load is retried
//! by the next caller unless the gateway is configured to poison failures.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use tracing::{error, info};

use super::pipeline::{PipelineLoader, SentimentPipeline, SummaryPipeline};
use crate::core::config::AppConfig;
use crate::core::models::{PipelineKind, SentimentLabel, SentimentResult, SummaryParams};
use crate::errors::InferenceError;

type LoadOutcome<P> = Result<Arc<P>, InferenceError>;
type LoadFuture<P> = Shared<BoxFuture<'static, LoadOutcome<P>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStates {
    pub sentiment: PipelineState,
    pub summarization: PipelineState,
}

enum Slot<P: ?Sized> {
    Unloaded,
    Loading { attempt: u64, future: LoadFuture<P> },
    Ready(Arc<P>),
    Failed { reason: String },
}

struct LazyPipeline<P: ?Sized> {
    kind: PipelineKind,
    slot: Arc<Mutex<Slot<P>>>,
    attempts: AtomicU64,
    poison_on_failure: bool,
}

// The lock is never held across an await.
fn lock<P: ?Sized>(slot: &Mutex<Slot<P>>) -> MutexGuard<'_, Slot<P>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Records the outcome of `attempt`, unless a newer attempt has taken the slot
/// or the outcome was already recorded.
fn settle<P: ?Sized>(
    slot: &Mutex<Slot<P>>,
    kind: PipelineKind,
    attempt: u64,
    outcome: &LoadOutcome<P>,
) {
    let mut slot = lock(slot);
    let current = matches!(&*slot, Slot::Loading { attempt: a, .. } if *a == attempt);
    if !current {
        return;
    }

    *slot = match outcome {
        Ok(pipeline) => {
            info!(%kind, attempt, "Pipeline ready");
            Slot::Ready(Arc::clone(pipeline))
        }
        Err(e) => {
            error!(%kind, attempt, error = %e, "Pipeline initialisation failed");
            Slot::Failed {
                reason: e.to_string(),
            }
        }
    };
}

impl<P> LazyPipeline<P>
where
    P: ?Sized + Send + Sync + 'static,
{
    fn new(kind: PipelineKind, poison_on_failure: bool) -> Self {
        Self {
            kind,
            slot: Arc::new(Mutex::new(Slot::Unloaded)),
            attempts: AtomicU64::new(0),
            poison_on_failure,
        }
    }

    fn state(&self) -> PipelineState {
        match &*lock(&self.slot) {
            Slot::Unloaded => PipelineState::Unloaded,
            Slot::Loading { .. } => PipelineState::Loading,
            Slot::Ready(_) => PipelineState::Ready,
            Slot::Failed { .. } => PipelineState::Failed,
        }
    }

    fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn get_or_init<F>(&self, init: F) -> LoadOutcome<P>
    where
        F: FnOnce() -> BoxFuture<'static, LoadOutcome<P>>,
    {
        let (attempt, future) = {
            let mut slot = lock(&self.slot);
            match &*slot {
                Slot::Ready(pipeline) => return Ok(Arc::clone(pipeline)),
                Slot::Failed { reason } if self.poison_on_failure => {
                    return Err(InferenceError::Unavailable {
                        kind: self.kind,
                        reason: reason.clone(),
                    });
                }
                Slot::Loading { attempt, future } => (*attempt, future.clone()),
                Slot::Unloaded | Slot::Failed { .. } => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    info!(kind = %self.kind, attempt, "Initialising pipeline");
                    let future = init().shared();

                    // The driver finishes the load and records it even if every
                    // waiting request goes away.
                    let driver_slot = Arc::clone(&self.slot);
                    let driven = future.clone();
                    let kind = self.kind;
                    tokio::spawn(async move {
                        let outcome = driven.await;
                        settle(&driver_slot, kind, attempt, &outcome);
                    });

                    *slot = Slot::Loading {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let outcome = future.await;
        settle(&self.slot, self.kind, attempt, &outcome);

        outcome.map_err(|e| match e {
            InferenceError::Unavailable { .. } => e,
            other => InferenceError::Unavailable {
                kind: self.kind,
                reason: other.to_string(),
            },
        })
    }
}

/// Lazily-initialised handles to the sentiment and summarisation pipelines.
///
/// Built once at startup and shared by all requests; cheap to call into once
/// both pipelines are ready.
pub struct InferenceGateway {
    sentiment_model: String,
    summarization_model: String,
    loader: Arc<dyn PipelineLoader>,
    sentiment: LazyPipeline<dyn SentimentPipeline>,
    summarizer: LazyPipeline<dyn SummaryPipeline>,
}

impl InferenceGateway {
    #[must_use]
    pub fn new(config: &AppConfig, loader: Arc<dyn PipelineLoader>) -> Self {
        Self {
            sentiment_model: config.sentiment_model.clone(),
            summarization_model: config.summarization_model.clone(),
            loader,
            sentiment: LazyPipeline::new(PipelineKind::Sentiment, config.poison_failed_pipelines),
            summarizer: LazyPipeline::new(
                PipelineKind::Summarization,
                config.poison_failed_pipelines,
            ),
        }
    }

    #[must_use]
    pub fn sentiment_model(&self) -> &str {
        &self.sentiment_model
    }

    #[must_use]
    pub fn summarization_model(&self) -> &str {
        &self.summarization_model
    }

    /// # Errors
    ///
    /// `InferenceError::Unavailable` if the pipeline cannot be initialised.
    pub async fn sentiment_pipeline(&self) -> Result<Arc<dyn SentimentPipeline>, InferenceError> {
        let loader = Arc::clone(&self.loader);
        let model = self.sentiment_model.clone();
        self.sentiment
            .get_or_init(move || async move { loader.load_sentiment(&model).await }.boxed())
            .await
    }

    /// # Errors
    ///
    /// `InferenceError::Unavailable` if the pipeline cannot be initialised.
    pub async fn summary_pipeline(&self) -> Result<Arc<dyn SummaryPipeline>, InferenceError> {
        let loader = Arc::clone(&self.loader);
        let model = self.summarization_model.clone();
        self.summarizer
            .get_or_init(move || async move { loader.load_summarizer(&model).await }.boxed())
            .await
    }

    /// Classifies one text, returning exactly one label/score pair.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the classifier cannot be initialised; any other
    /// variant if the model call itself fails.
    pub async fn classify_sentiment(&self, text: &str) -> Result<SentimentResult, InferenceError> {
        let pipeline = self.sentiment_pipeline().await?;
        let raw = pipeline.classify(text).await?;

        Ok(SentimentResult {
            label: SentimentLabel::from(raw.label.as_str()),
            score: raw.score,
            model_id: self.sentiment_model.clone(),
        })
    }

    /// # Errors
    ///
    /// `Unavailable` if the summariser cannot be initialised; any other
    /// variant if the model call itself fails.
    pub async fn summarize(
        &self,
        text: &str,
        params: SummaryParams,
    ) -> Result<String, InferenceError> {
        let pipeline = self.summary_pipeline().await?;
        pipeline.summarize(text, params).await
    }

    #[must_use]
    pub fn pipeline_states(&self) -> PipelineStates {
        PipelineStates {
            sentiment: self.sentiment.state(),
            summarization: self.summarizer.state(),
        }
    }

    /// Healthy means the sentiment pipeline is loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.sentiment.state() == PipelineState::Ready
    }

    /// Number of initialisation attempts started so far for `kind`.
    #[must_use]
    pub fn load_attempts(&self, kind: PipelineKind) -> u64 {
        match kind {
            PipelineKind::Sentiment => self.sentiment.attempts(),
            PipelineKind::Summarization => self.summarizer.attempts(),
        }
    }

    /// Starts loading both pipelines in the background.
    pub fn warm_up(self: &Arc<Self>) {
        let gateway = Arc::clone(self);
        tokio::spawn(async move {
            let (sentiment, summarizer) =
                tokio::join!(gateway.sentiment_pipeline(), gateway.summary_pipeline());
            if let Err(e) = sentiment {
                error!(error = %e, "Sentiment warm-up failed");
            }
            if let Err(e) = summarizer {
                error!(error = %e, "Summarization warm-up failed");
            }
        });
    }
}
