use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;

use crate::credentials::ServiceAccountKey;
use crate::errors::SheetsError;
use crate::types::AccessToken;
use crate::utils::send_request;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, scopes: &[&str], now: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scopes.join(" "),
            aud: key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Signs the RS256 assertion for the service account.
pub fn sign_assertion(key: &ServiceAccountKey, scopes: &[&str]) -> Result<String, SheetsError> {
    let claims = AssertionClaims::new(key, scopes, Utc::now().timestamp());

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SheetsError::Authentication(format!("Invalid private key: {}", e)))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| SheetsError::Authentication(format!("Failed to sign assertion: {}", e)))
}

/// Exchanges a signed assertion for a bearer token at the key's `token_uri`.
#[cfg_attr(feature = "tracing", instrument(skip(client, key), fields(client_email = %key.client_email)))]
pub async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
    scopes: &[&str],
) -> Result<AccessToken, SheetsError> {
    let assertion = sign_assertion(key, scopes)?;

    #[cfg(feature = "tracing")]
    debug!(token_uri = %key.token_uri, "Requesting service account access token");

    let request = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);

    let body = match send_request(request).await {
        Ok(body) => body,
        Err(SheetsError::ApiError { status, body }) if status.is_client_error() => {
            return Err(SheetsError::Authentication(format!(
                "Token endpoint rejected credentials ({}): {}",
                status, body
            )))
        }
        Err(e) => return Err(e),
    };

    serde_json::from_value(body)
        .map_err(|e| SheetsError::Authentication(format!("Malformed token response: {}", e)))
}
