use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::{app_state::AppState, auth_middleware::ApiKey, payload::CheckPayload};
use crate::domain::{errors::AppError, models::CheckResult, ports::audit_log::CredentialStatus};

pub async fn root_route() -> Json<Value> {
    Json(json!({ "message": "IP Checker API is working!" }))
}

pub async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

pub async fn env_check_route(_: ApiKey, State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(state.ip_check_service.credential_status())
}

pub async fn ip_check_route(
    _: ApiKey,
    State(state): State<AppState>,
    CheckPayload(request): CheckPayload,
) -> Result<Json<CheckResult>, AppError> {
    let result = state.ip_check_service.check(request).await?;
    Ok(Json(result))
}
