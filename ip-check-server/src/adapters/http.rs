use std::net::SocketAddr;

use anyhow::Context;
use axum::{routing::*, Router};
use tokio::net;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{app_state::AppState, routes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

pub struct HttpServer {
    router: Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new(config: HttpServerConfig<'_>, state: AppState) -> anyhow::Result<Self> {
        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            });

        let router = router(state)
            .layer(trace_layer)
            .layer(CorsLayer::permissive());

        let port = config
            .port
            .parse::<u16>()
            .with_context(|| format!("invalid server port {:?}", config.port))?;
        let addr = SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], port));

        let listener = net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to listen on port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            "listening on {}",
            self.listener
                .local_addr()
                .context("listener has no local address")?
        );
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root_route))
        .route("/health", get(routes::health_route))
        .route("/env-check", get(routes::env_check_route))
        .route("/ip-check", post(routes::ip_check_route))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
