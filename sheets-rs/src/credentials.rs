use base64::decode;
use serde::Deserialize;

use crate::errors::SheetsError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The subset of a Google service-account JSON key needed to mint tokens.
#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        serde_json::from_str(json).map_err(|e| {
            SheetsError::Credentials(format!(
                "Provided service account key is not valid JSON: {}",
                e
            ))
        })
    }

    /// Accepts either the raw JSON key or its base64 encoding.
    pub fn from_blob(blob: &str) -> Result<Self, SheetsError> {
        let trimmed = blob.trim();
        if trimmed.starts_with('{') {
            return Self::from_json(trimmed);
        }

        let decoded = decode(trimmed).map_err(|e| {
            SheetsError::Credentials(format!("Failed to decode base64 service account key: {}", e))
        })?;
        let decoded = String::from_utf8(decoded).map_err(|e| {
            SheetsError::Credentials(format!("Decoded base64 is not valid UTF-8: {}", e))
        })?;

        Self::from_json(&decoded)
    }
}
