use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failures of the audit log, one variant per step of the write.
#[derive(Error, Debug)]
pub enum AuditLogError {
    #[error("Google Sheets credentials not found in environment variable")]
    Config,
    #[error("Invalid Google Sheets credentials format: {0}")]
    Parse(String),
    #[error("Failed to authenticate with Google Sheets: {0}")]
    Authentication(String),
    #[error("Failed to write to Google Sheets: {0}")]
    Write(String),
}

impl AuditLogError {
    /// Fixed text returned to callers; the cause stays in the logs.
    pub fn detail(&self) -> &'static str {
        match self {
            AuditLogError::Config => "Google Sheets credentials not found in environment variable",
            AuditLogError::Parse(_) => "Invalid Google Sheets credentials format",
            AuditLogError::Authentication(_) => "Failed to authenticate with Google Sheets",
            AuditLogError::Write(_) => "Failed to write to Google Sheets",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Geolocation lookup failed: {0}")]
    Geolocation(String),
    #[error("Audit log error: {0}")]
    AuditLog(#[from] AuditLogError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Geolocation(_) => StatusCode::BAD_GATEWAY,
            AppError::AuditLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "Unauthorized",
            AppError::InvalidBody(_) => "Request body must be a JSON object",
            AppError::Geolocation(_) => "Geolocation lookup failed",
            AppError::AuditLog(e) => e.detail(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if let AppError::InvalidBody(reason) = &self {
            tracing::warn!(%reason, "rejected request body");
        }
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
