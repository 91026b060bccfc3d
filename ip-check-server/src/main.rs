pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
#[cfg(test)]
mod test_support;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let app_config = config::AppConfig::load().context("failed to load configuration")?;
    tracing::debug!(config = ?app_config, "configuration loaded");

    let port = app_config.server_port.clone();
    let state = adapters::app_state::AppState::from_config(app_config)?;

    let http_server = adapters::http::HttpServer::new(
        adapters::http::HttpServerConfig { port: &port },
        state,
    )
    .await
    .context("failed to create HTTP server")?;
    http_server.run().await.context("failed to run HTTP server")
}
