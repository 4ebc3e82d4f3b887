//! Panic guard for request handlers.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::web::error::{ApiError, INTERNAL_ERROR};

/// Turn a panicking handler into a JSON 500.
///
/// The panic itself is logged by the process-wide hook; this only shapes
/// the response so the client still gets `{"message": ...}`.
fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    ApiError::internal(INTERNAL_ERROR).into_response()
}

/// Create the panic-catching layer.
pub fn create_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_response as fn(Box<dyn Any + Send + 'static>) -> Response)
}
