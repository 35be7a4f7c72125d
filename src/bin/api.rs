use std::sync::Arc;

use feedback_insights::ai::{HttpPipelineLoader, InferenceClient, InferenceGateway, PipelineLoader};
use feedback_insights::api::{AppState, build_router};
use feedback_insights::core::config::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            feedback_insights::setup_logging(false);
            error!("Config error: {}", e);
            anyhow::bail!("Config error: {e}");
        }
    };
    feedback_insights::setup_logging(config.debug);

    info!(
        sentiment_model = %config.sentiment_model,
        summarization_model = %config.summarization_model,
        inference_url = %config.inference_url,
        max_input_length = config.max_input_length,
        max_summary_input_length = config.max_summary_input_length,
        "Configuration loaded"
    );

    let client = Arc::new(InferenceClient::new(&config)?);
    let loader: Arc<dyn PipelineLoader> = Arc::new(HttpPipelineLoader::new(client));
    let gateway = Arc::new(InferenceGateway::new(&config, loader));
    if config.warm_up_models {
        gateway.warm_up();
    }

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, gateway));

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
