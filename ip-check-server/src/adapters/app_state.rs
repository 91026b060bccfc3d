use std::sync::Arc;

use anyhow::Context;

use crate::{
    application::services::ip_check_service::IpCheckService,
    config::AppConfig,
    domain::ports::credentials::CredentialVerifier,
    infrastructure::{
        ip_api::IpApiLocator, sheets_audit_log::SheetsAuditLog, static_key::StaticKeyVerifier,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub ip_check_service: Arc<IpCheckService>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let geo = IpApiLocator::new(
            &config.geo_api_host,
            config.outbound_timeout(),
            config.outbound_retries,
            config.retry_delay(),
        )
        .context("failed to build geolocation client")?;
        let audit_log = SheetsAuditLog::new(&config);

        if config.google_sheets_credentials.is_none() {
            tracing::warn!("Google Sheets credentials missing, /ip-check will fail until configured");
        }

        Ok(Self {
            verifier: Arc::new(StaticKeyVerifier::new(config.api_key.clone())),
            ip_check_service: Arc::new(IpCheckService::new(Arc::new(geo), Arc::new(audit_log))),
            config: Arc::new(config),
        })
    }
}
