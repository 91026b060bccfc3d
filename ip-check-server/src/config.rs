use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Shared secret callers send in `x-api-key` unless `API_KEY` overrides it.
pub const DEFAULT_API_KEY: &str = "rigour-ip-checking-service";

pub const CREDENTIALS_ENV_KEY: &str = "GOOGLE_SHEETS_CREDENTIALS";

#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub server_port: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_geo_api_host")]
    pub geo_api_host: String,
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,
    #[serde(default = "default_timeout_secs")]
    pub outbound_timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub outbound_retries: usize,
    #[serde(default = "default_retry_delay_millis")]
    pub retry_delay_millis: u64,
    #[serde(default)]
    pub google_sheets_credentials: Option<String>,
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_geo_api_host() -> String {
    "ip-api.com".to_string()
}

fn default_spreadsheet_name() -> String {
    "IP Check Log".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    1
}

fn default_retry_delay_millis() -> u64 {
    200
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: default_port(),
            api_key: default_api_key(),
            geo_api_host: default_geo_api_host(),
            spreadsheet_name: default_spreadsheet_name(),
            outbound_timeout_secs: default_timeout_secs(),
            outbound_retries: default_retries(),
            retry_delay_millis: default_retry_delay_millis(),
            google_sheets_credentials: None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server_port", &self.server_port)
            .field("geo_api_host", &self.geo_api_host)
            .field("spreadsheet_name", &self.spreadsheet_name)
            .field("outbound_timeout_secs", &self.outbound_timeout_secs)
            .field("outbound_retries", &self.outbound_retries)
            .field("retry_delay_millis", &self.retry_delay_millis)
            .field(
                "google_sheets_credentials",
                &self.google_sheets_credentials.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let conf = Config::builder()
            .add_source(File::with_name("config.toml").required(false))
            .add_source(Environment::default())
            .build()?;

        let mut config: AppConfig = conf.try_deserialize()?;
        // An empty variable counts as not configured.
        if config
            .google_sheets_credentials
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            config.google_sheets_credentials = None;
        }
        Ok(config)
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_millis)
    }
}
