use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handler::handle_panic;
use super::state::AppState;
use super::{health_handler, sentiment_handler, summary_handler, weekly_handler};

/// Builds the HTTP surface: three JSON endpoints plus `/health`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sentiment", post(sentiment_handler::handle_sentiment))
        .route(
            "/summarize-feedback",
            post(summary_handler::handle_summarize_feedback),
        )
        .route("/weekly-summary", post(weekly_handler::handle_weekly_summary))
        .route("/health", get(health_handler::handle_health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
