use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use signpost::analytics::AnalyticsReporter;
use signpost::config::Config;
use signpost::redirect::{create_redirect_router, RedirectResolver};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (also pulls in .env before RUST_LOG is read)
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Loaded configuration");
    info!(
        "📄 Redirect table: {} (re-read on every request)",
        config.resolver.config_file.display()
    );
    if !config.resolver.config_file.is_file() {
        tracing::warn!(
            "Redirect table {} does not exist yet; requests will fail with 500 until it is created",
            config.resolver.config_file.display()
        );
    }

    let reporter = AnalyticsReporter::from_config(&config.analytics)
        .context("failed to initialise analytics reporter")?;

    let router = create_redirect_router(
        RedirectResolver::new(config.resolver.config_file.clone()),
        reporter,
        config.resolver.redirect_status,
        &config.static_files.dir,
    );

    info!("🎨 Serving static files from {}", config.static_files.dir.display());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Redirect server listening on http://{}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Redirect server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}
