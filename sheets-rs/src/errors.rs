use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Google API returned error ({status}): {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Spreadsheet {0} has no worksheets")]
    WorksheetNotFound(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

impl SheetsError {
    /// True for failures where repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetsError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SheetsError::ApiError { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// True only when the server cannot have applied the request, so a
    /// non-idempotent call such as an append may be sent again.
    pub fn is_safe_to_resend(&self) -> bool {
        match self {
            SheetsError::HttpError(e) => e.is_connect(),
            SheetsError::ApiError { status, .. } => matches!(
                *status,
                reqwest::StatusCode::TOO_MANY_REQUESTS | reqwest::StatusCode::SERVICE_UNAVAILABLE
            ),
            _ => false,
        }
    }
}
