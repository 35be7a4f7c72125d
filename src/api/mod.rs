//! HTTP API: routing, request handling and response shaping

pub mod handler;
pub mod health_handler;
pub mod parsing;
pub mod response;
pub mod router;
pub mod sentiment_handler;
pub mod state;
pub mod summary_handler;
pub mod weekly_handler;

// Re-export the router and state for convenience
pub use router::build_router;
pub use state::AppState;
