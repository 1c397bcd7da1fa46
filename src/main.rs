use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use archive_history::app_state::build_app_state;
use archive_history::core::client::archive_client::ArchiveHttpClient;
use archive_history::core::config::ArchiveConfig;
use archive_history::core::metadata::StaticMetadataCatalog;
use archive_history::logging;
use archive_history::routes::app_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    let log_dir = env::var(logging::ENV_LOG_DIR).ok().filter(|d| !d.trim().is_empty());
    logging::init(log_dir.as_deref())?;

    let config = ArchiveConfig::from_env().context("Failed to load archive configuration")?;
    info!(
        "Archive {} instance {} (page size {})",
        config.archive_url, config.instance, config.max_page_size
    );

    let transport = ArchiveHttpClient::with_timeout(config.request_timeout)
        .context("Failed to build archive HTTP client")?;
    let metadata = StaticMetadataCatalog::new()
        .with_aggregate_keys(config.aggregate_keys.iter().cloned())
        .with_image_keys(config.image_keys.iter().cloned())
        .with_enum_keys(config.enum_keys.iter().cloned());

    let state = build_app_state(&config, Arc::new(transport), Arc::new(metadata));
    let app = app_router().with_state(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
