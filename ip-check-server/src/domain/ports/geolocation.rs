use async_trait::async_trait;

use crate::domain::{errors::AppError, models::GeoLocation};

#[async_trait]
pub trait GeoLocator: Send + Sync + 'static {
    /// Resolves `ip` exactly as given; an empty string asks the upstream
    /// about the caller's own address.
    async fn locate(&self, ip: &str) -> Result<GeoLocation, AppError>;
}
