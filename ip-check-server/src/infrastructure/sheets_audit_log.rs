use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sheets_rs::{types::Config as SheetsConfig, ServiceAccountKey, Sheets, SheetsError};
use tokio_retry::RetryIf;

use super::retry::fixed_retries;
use crate::config::{AppConfig, CREDENTIALS_ENV_KEY};
use crate::domain::{
    errors::AuditLogError,
    models::AuditRecord,
    ports::audit_log::{AuditLog, CredentialStatus},
};

/// Appends audit rows to the first worksheet of a named spreadsheet.
///
/// The credential is taken from the startup configuration but parsed and
/// exchanged for a token on every append, so a bad key fails each request
/// the same way.
pub struct SheetsAuditLog {
    credentials: Option<String>,
    spreadsheet_name: String,
    sheets_config: SheetsConfig,
    retries: usize,
    retry_delay: Duration,
}

impl SheetsAuditLog {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            credentials: config.google_sheets_credentials.clone(),
            spreadsheet_name: config.spreadsheet_name.clone(),
            sheets_config: SheetsConfig {
                timeout: Some(config.outbound_timeout()),
                ..SheetsConfig::default()
            },
            retries: config.outbound_retries,
            retry_delay: config.retry_delay(),
        }
    }

    /// Points the client at other Google API hosts.
    pub fn with_sheets_config(mut self, sheets_config: SheetsConfig) -> Self {
        self.sheets_config = sheets_config;
        self
    }

    async fn retrying<T, F, Fut>(
        &self,
        action: F,
        should_retry: fn(&SheetsError) -> bool,
    ) -> Result<T, SheetsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SheetsError>>,
    {
        RetryIf::spawn(
            fixed_retries(self.retries, self.retry_delay),
            action,
            should_retry,
        )
        .await
    }

    fn key(&self) -> Result<ServiceAccountKey, AuditLogError> {
        let blob = self.credentials.as_deref().ok_or_else(|| {
            tracing::error!(
                "{} is not set, cannot write audit row",
                CREDENTIALS_ENV_KEY
            );
            AuditLogError::Config
        })?;

        ServiceAccountKey::from_blob(blob).map_err(|e| {
            tracing::error!(error = %e, "failed to parse Google Sheets credentials");
            AuditLogError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl AuditLog for SheetsAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditLogError> {
        let key = self.key()?;

        let sheets = self
            .retrying(
                || Sheets::authenticate(&key, Some(self.sheets_config.clone())),
                SheetsError::is_transient,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, client_email = %key.client_email, "Google Sheets authentication failed");
                AuditLogError::Authentication(e.to_string())
            })?;

        let write_error = |e: SheetsError| {
            tracing::error!(error = %e, spreadsheet = %self.spreadsheet_name, "failed to write audit row");
            AuditLogError::Write(e.to_string())
        };

        let spreadsheet_id = self
            .retrying(
                || sheets.open(&self.spreadsheet_name),
                SheetsError::is_transient,
            )
            .await
            .map_err(write_error)?;
        let worksheet = self
            .retrying(
                || sheets.first_worksheet(&spreadsheet_id),
                SheetsError::is_transient,
            )
            .await
            .map_err(write_error)?;

        // Appends are not idempotent: resend only what the server refused.
        let row = record.to_row();
        self.retrying(
            || sheets.append_row(&spreadsheet_id, &worksheet, row.clone()),
            SheetsError::is_safe_to_resend,
        )
        .await
            .map_err(write_error)?;

        tracing::info!(
            spreadsheet = %self.spreadsheet_name,
            %worksheet,
            "audit row appended"
        );
        Ok(())
    }

    fn credential_status(&self) -> CredentialStatus {
        CredentialStatus {
            found: self.credentials.is_some(),
            length: self
                .credentials
                .as_deref()
                .map(|c| c.chars().count())
                .unwrap_or(0),
        }
    }
}
