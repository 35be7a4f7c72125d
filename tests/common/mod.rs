#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use feedback_insights::ai::{
    Classification, InferenceGateway, PipelineLoader, SentimentPipeline, SummaryPipeline,
};
use feedback_insights::api::{AppState, build_router};
use feedback_insights::core::config::AppConfig;
use feedback_insights::core::models::SummaryParams;
use feedback_insights::errors::InferenceError;

/// How the fake backend behaves for one pipeline kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Works,
    FailsToLoad,
    FailsAtRuntime,
}

#[derive(Default)]
pub struct Counters {
    pub loads: AtomicUsize,
    pub calls: AtomicUsize,
}

impl Counters {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct FakeSentiment {
    behaviour: Behaviour,
    counters: Arc<Counters>,
}

#[async_trait]
impl SentimentPipeline for FakeSentiment {
    async fn classify(&self, text: &str) -> Result<Classification, InferenceError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        if self.behaviour == Behaviour::FailsAtRuntime {
            return Err(InferenceError::Model("CUDA out of memory at 0xdeadbeef".to_string()));
        }
        let label = if text.contains("bad") { "NEGATIVE" } else { "POSITIVE" };
        Ok(Classification {
            label: label.to_string(),
            score: 0.99,
        })
    }
}

pub struct FakeSummary {
    behaviour: Behaviour,
    counters: Arc<Counters>,
}

#[async_trait]
impl SummaryPipeline for FakeSummary {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, InferenceError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        if self.behaviour == Behaviour::FailsAtRuntime {
            return Err(InferenceError::Model("tensor shape mismatch in layer 7".to_string()));
        }
        Ok(format!(
            "summary({}..{}) of: {}",
            params.min_length, params.max_length, text
        ))
    }
}

pub struct FakeLoader {
    pub sentiment: Behaviour,
    pub summary: Behaviour,
    pub load_delay: Duration,
    pub sentiment_counters: Arc<Counters>,
    pub summary_counters: Arc<Counters>,
}

impl FakeLoader {
    pub fn new(sentiment: Behaviour, summary: Behaviour) -> Self {
        Self {
            sentiment,
            summary,
            load_delay: Duration::from_millis(0),
            sentiment_counters: Arc::new(Counters::default()),
            summary_counters: Arc::new(Counters::default()),
        }
    }

    pub fn working() -> Self {
        Self::new(Behaviour::Works, Behaviour::Works)
    }
}

#[async_trait]
impl PipelineLoader for FakeLoader {
    async fn load_sentiment(
        &self,
        _model_id: &str,
    ) -> Result<Arc<dyn SentimentPipeline>, InferenceError> {
        self.sentiment_counters.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.load_delay).await;
        if self.sentiment == Behaviour::FailsToLoad {
            return Err(InferenceError::Http("connection refused".to_string()));
        }
        Ok(Arc::new(FakeSentiment {
            behaviour: self.sentiment,
            counters: Arc::clone(&self.sentiment_counters),
        }))
    }

    async fn load_summarizer(
        &self,
        _model_id: &str,
    ) -> Result<Arc<dyn SummaryPipeline>, InferenceError> {
        self.summary_counters.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.load_delay).await;
        if self.summary == Behaviour::FailsToLoad {
            return Err(InferenceError::Http("connection refused".to_string()));
        }
        Ok(Arc::new(FakeSummary {
            behaviour: self.summary,
            counters: Arc::clone(&self.summary_counters),
        }))
    }
}

pub fn config_with(vars: &[(&str, &str)]) -> AppConfig {
    AppConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })
    .expect("test config should be valid")
}

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<InferenceGateway>,
    pub loader: Arc<FakeLoader>,
}

pub fn test_app_with(loader: FakeLoader, config: AppConfig) -> TestApp {
    let loader = Arc::new(loader);
    let gateway = Arc::new(InferenceGateway::new(
        &config,
        Arc::clone(&loader) as Arc<dyn PipelineLoader>,
    ));
    let router = build_router(AppState::new(config, Arc::clone(&gateway)));
    TestApp {
        router,
        gateway,
        loader,
    }
}

pub fn test_app(loader: FakeLoader) -> TestApp {
    test_app_with(loader, config_with(&[]))
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should always answer");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_raw(router: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(router, request).await
}

pub async fn post_json(router: &Router, path: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(router, path, &body.to_string()).await
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("valid request");
    send(router, request).await
}
