use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    errors::AppError,
    models::{AuditRecord, CheckRequest, CheckResult},
    ports::{
        audit_log::{AuditLog, CredentialStatus},
        geolocation::GeoLocator,
    },
};

/// Looks up the address, writes the audit row, returns the enriched record.
/// A failed audit write fails the whole check.
#[derive(Clone)]
pub struct IpCheckService {
    geo: Arc<dyn GeoLocator>,
    audit_log: Arc<dyn AuditLog>,
}

impl IpCheckService {
    pub fn new(geo: Arc<dyn GeoLocator>, audit_log: Arc<dyn AuditLog>) -> Self {
        Self { geo, audit_log }
    }

    pub async fn check(&self, request: CheckRequest) -> Result<CheckResult, AppError> {
        let geo = self.geo.locate(&request.ip_segment()).await?;
        let result = CheckResult::new(request, geo);

        tracing::info!(
            project_id = ?result.project_id,
            respondent_id = ?result.respondent_id,
            ip_address = ?result.ip_address,
            country = %result.country,
            "ip resolved"
        );

        let record = AuditRecord::new(result, Utc::now());
        self.audit_log.append(&record).await?;

        Ok(record.result)
    }

    pub fn credential_status(&self) -> CredentialStatus {
        self.audit_log.credential_status()
    }
}
