use anyhow::Context;
use sample_api::{app, AppState};
use sample_infra::{build_orchestrator, Config, ReqwestTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                concat!(
                    "sample_api=debug,sample_order=debug,sample_infra=debug,",
                    "tower_http=debug,axum::rejection=trace"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting sample API on port {}", config.server.port);

    let transport =
        ReqwestTransport::new(config.http.timeout()).context("Failed to build HTTP client")?;
    let orchestrator = build_orchestrator(&config, Arc::new(transport));
    tracing::info!(settings = ?orchestrator.settings(), "Pipeline configured");

    let app = app(AppState::new(orchestrator));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
