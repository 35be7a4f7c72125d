use std::sync::Arc;

use crate::ai::InferenceGateway;
use crate::core::config::AppConfig;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<InferenceGateway>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, gateway: Arc<InferenceGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }
}
