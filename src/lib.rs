//! Feedback Insights - an HTTP service that runs customer feedback through
//! pretrained sentiment and summarisation models.
//!
//! The crate is the request-processing layer in front of those models:
//! it validates and groups feedback, calls the models through a single
//! gateway, and answers with a uniform JSON envelope.
//!
//! # Architecture
//!
//! - `validation` and `aggregate` are pure functions over request payloads
//! - `ai` holds the model contract, an HTTP backend and the `InferenceGateway`
//!   that initialises each pipeline once, on first use
//! - `api` is the axum surface: `/sentiment`, `/summarize-feedback`,
//!   `/weekly-summary` and `/health`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use feedback_insights::ai::{HttpPipelineLoader, InferenceClient, InferenceGateway};
//! use feedback_insights::api::{AppState, build_router};
//! use feedback_insights::core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     feedback_insights::setup_logging(config.debug);
//!
//!     let client = Arc::new(InferenceClient::new(&config)?);
//!     let gateway = Arc::new(InferenceGateway::new(
//!         &config,
//!         Arc::new(HttpPipelineLoader::new(client)),
//!     ));
//!
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//!     axum::serve(listener, build_router(AppState::new(config, gateway))).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod aggregate;
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod utils;
pub mod validation;

/// Configure structured JSON logging.
///
/// Honours `RUST_LOG`; otherwise logs at `info`, or `debug` when `debug` is
/// set. Safe to call more than once: later calls leave the first subscriber
/// in place.
///
/// # Example
///
/// ```
/// feedback_insights::setup_logging(false);
/// ```
pub fn setup_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
