use crate::errors::SheetsError;
use reqwest::RequestBuilder;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::{debug, error};

pub async fn send_request(request: RequestBuilder) -> Result<Value, SheetsError> {
    let res = request.header("Accept", "application/json").send().await?;

    let status = res.status();
    #[cfg(feature = "tracing")]
    let url = res.url().clone();
    if status.is_success() {
        let body = res.text().await?;
        #[cfg(feature = "tracing")]
        debug!(status = ?status, %url, "Google API request successful");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| SheetsError::Other(format!("Invalid JSON in response: {}", e)))
    } else {
        let body = res
            .text()
            .await
            .unwrap_or_else(|_| "<could not read body>".into());
        #[cfg(feature = "tracing")]
        error!(status = ?status, %url, body = %body, "Google API returned error");
        Err(SheetsError::ApiError { status, body })
    }
}

/// Builds the A1 range addressing the top-left cell of `worksheet`.
pub fn worksheet_range(worksheet: &str) -> String {
    format!("'{}'!A1", worksheet.replace('\'', "''"))
}

/// Drive query matching a non-trashed spreadsheet with exactly this name.
pub fn spreadsheet_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
        escaped
    )
}
