//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{apply_job, send_contact_email, AppState};
use super::middleware::{create_cors_layer, create_panic_layer};
use crate::upload::DocumentField;

/// Allowance for text fields and multipart framing on top of the files.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Largest acceptable `/apply-job` body: every document field at the limit.
pub fn upload_body_limit(max_file_size: u64) -> usize {
    let limit = max_file_size
        .saturating_mul(DocumentField::ALL.len() as u64)
        .saturating_add(FORM_OVERHEAD_BYTES);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = upload_body_limit(app_state.intake.max_file_size());

    let api_routes = Router::new()
        .route("/send-email", post(send_contact_email))
        .route(
            "/apply-job",
            post(apply_job).layer(DefaultBodyLimit::max(body_limit)),
        );

    Router::new()
        .merge(api_routes)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(create_panic_layer()),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
