use mimalloc::MiMalloc;
use rust_regmail::api::{ApiServer, ApiServerConfig};
use rust_regmail::config::AppConfig;
use rust_regmail::logging::{self, LOG_RETENTION_DAYS};
use rust_regmail::services::ServiceContainer;
use rust_regmail::utils::http_client::install_rustls_provider;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Keep the guard alive so buffered file output is flushed on exit.
    let _log_guard = logging::init_logging(config.log_dir.as_deref())?;
    config.log_summary();

    if let Some(log_dir) = config.log_dir.clone() {
        tokio::spawn(async move {
            if let Err(e) = logging::cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS).await {
                tracing::warn!(error = %e, "Failed to clean up old log files");
            }
        });
    }

    install_rustls_provider();

    let container = ServiceContainer::new(&config).await?;
    let server = ApiServer::with_state(ApiServerConfig::from_env_or_default(), container.app_state());

    let cancel_token = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
            cancel_token.cancel();
        }
    });

    tracing::info!("rust-regmail started");
    server.run().await?;

    container.shutdown().await;
    Ok(())
}
