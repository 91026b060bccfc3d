use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio_retry::Retry;

use super::retry::fixed_retries;
use crate::domain::{errors::AppError, models::GeoLocation, ports::geolocation::GeoLocator};

/// Geolocation through the ip-api.com JSON endpoint.
pub struct IpApiLocator {
    client: Client,
    host: String,
    retries: usize,
    retry_delay: Duration,
}

impl IpApiLocator {
    pub fn new(
        host: &str,
        timeout: Duration,
        retries: usize,
        retry_delay: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            host: host.to_string(),
            retries,
            retry_delay,
        })
    }

    pub fn lookup_url(&self, ip: &str) -> String {
        format!("http://{}/json/{}", self.host, ip)
    }

    async fn fetch(&self, url: &str) -> Result<Value, reqwest::Error> {
        self.client.get(url).send().await?.json::<Value>().await
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, ip: &str) -> Result<GeoLocation, AppError> {
        let url = self.lookup_url(ip);
        tracing::debug!(%url, "looking up ip");

        let body = Retry::spawn(fixed_retries(self.retries, self.retry_delay), || {
            self.fetch(&url)
        })
        .await
        .map_err(|e| {
            tracing::error!(%url, error = %e, "geolocation lookup failed");
            AppError::Geolocation(e.to_string())
        })?;

        if body.get("status").and_then(Value::as_str) == Some("fail") {
            tracing::warn!(
                ip,
                message = ?body.get("message"),
                "geolocation service could not resolve address"
            );
        }

        Ok(GeoLocation::from_lookup(&body))
    }
}
