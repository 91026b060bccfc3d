use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;

use crate::domain::{errors::AppError, models::CheckRequest};

/// `/ip-check` body: a JSON object, read by key.
///
/// A request without `Content-Type` is parsed as JSON too; any other
/// non-JSON content type is refused.
pub struct CheckPayload(pub CheckRequest);

fn is_json_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

impl<S> FromRequest<S> for CheckPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or("");
            if !is_json_content_type(content_type) {
                return Err(AppError::InvalidBody(format!(
                    "unsupported content type {:?}",
                    content_type
                )));
            }
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(object)) => Ok(CheckPayload(CheckRequest::from_object(&object))),
            Ok(other) => Err(AppError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(AppError::InvalidBody(e.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
