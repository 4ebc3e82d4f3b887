//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::{ApiError, INVALID_JSON_BODY};

/// A JSON extractor that validates the request body.
///
/// Any validation failure is reported as `Missing required fields`. A
/// request without a JSON content type is treated like an empty form.
///
/// # Example
///
/// ```ignore
/// use formrelay::web::dto::ValidatedJson;
///
/// async fn send(
///     ValidatedJson(payload): ValidatedJson<ContactRequest>,
/// ) -> Result<Json<MessageResponse>, ApiError> {
///     // payload is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| match e {
                JsonRejection::MissingJsonContentType(_) => ApiError::missing_fields(),
                other => {
                    tracing::warn!("Rejected JSON body: {}", other);
                    ApiError::bad_request(INVALID_JSON_BODY)
                }
            })?;

        value.validate().map_err(|e| {
            tracing::debug!("Validation failed: {}", e);
            ApiError::missing_fields()
        })?;

        Ok(ValidatedJson(value))
    }
}
