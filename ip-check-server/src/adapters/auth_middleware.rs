use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};

use super::app_state::AppState;
use crate::domain::errors::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Present on requests whose `x-api-key` passes the configured verifier.
pub struct ApiKey;

impl<S> FromRequestParts<S> for ApiKey
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let State(state): State<AppState> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok());

        match key {
            Some(key) if state.verifier.validate(key) => Ok(ApiKey),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "rejected request with invalid api key");
                Err(AppError::Unauthorized)
            }
        }
    }
}
