//! `GET /health`

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::state::AppState;
use crate::ai::gateway::PipelineStates;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: PipelineStates,
}

/// `OK` only once the sentiment pipeline is ready. Never triggers a load.
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.gateway.is_ready() { "OK" } else { "ERROR" };

    Json(HealthResponse {
        status,
        models: state.gateway.pipeline_states(),
    })
}
