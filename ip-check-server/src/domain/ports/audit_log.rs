use async_trait::async_trait;

use crate::domain::{errors::AuditLogError, models::AuditRecord};

#[async_trait]
pub trait AuditLog: Send + Sync + 'static {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditLogError>;

    /// Presence and length of the credential the log writes with.
    fn credential_status(&self) -> CredentialStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CredentialStatus {
    pub found: bool,
    pub length: usize,
}
