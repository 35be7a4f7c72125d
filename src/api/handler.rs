//! Uniform wrapping applied to every JSON endpoint.
//!
//! `guarded` runs one handler body inside a request span, logs how it ended
//! and turns any `ApiError` into the standard error envelope. Panics are
//! caught one layer further out by the router.

use std::any::Any;
use std::future::Future;

use axum::http::StatusCode;
use axum::response::Response;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::response::{self, Envelope};
use crate::errors::ApiError;

/// Runs `work` for the endpoint called `handler` and renders its outcome.
pub async fn guarded<F>(handler: &'static str, work: F) -> Response
where
    F: Future<Output = Result<Envelope, ApiError>>,
{
    let request_id = Uuid::new_v4();
    let span = info_span!("request", handler, %request_id);

    async move {
        match work.await {
            Ok(envelope) => {
                info!("Request completed");
                response::respond(StatusCode::OK, envelope)
            }
            Err(e) => {
                log_failure(handler, &e);
                axum::response::IntoResponse::into_response(e)
            }
        }
    }
    .instrument(span)
    .await
}

fn log_failure(handler: &str, error: &ApiError) {
    match error {
        ApiError::Validation(e) => {
            warn!(handler, error = %e, "Rejected invalid request");
        }
        ApiError::ServiceUnavailable { kind, reason } => {
            warn!(handler, %kind, reason = %reason, "Model unavailable");
        }
        ApiError::Inference { operation, cause } => {
            error!(handler, operation, error = %cause, "Inference failed");
        }
        ApiError::Internal(detail) => {
            error!(handler, detail = %detail, "Internal error");
        }
    }
}

/// Converts a handler panic into the standard 500 envelope.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(detail = %detail, "Handler panicked");

    let internal = ApiError::Internal(detail);
    let (status, envelope) = response::err(&internal.client_message(), internal.status_code());
    response::respond(status, envelope)
}
