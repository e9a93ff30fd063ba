//! Service Cache - cache host process
//!
//! Owns the service's shared cache for the lifetime of the process.

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_cache::{AppState, InMemoryConfig};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache configuration from environment variables
/// 3. Create the shared cache (which starts its expiry sweep)
/// 4. Wait for SIGINT/SIGTERM, then drop the cache to stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "service_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting service cache");

    let config = InMemoryConfig::from_env().context("Failed to load cache configuration")?;
    info!(
        "Configuration loaded: default_expiration={}m, cleanup_interval={}m",
        config.default_expiration, config.cleanup_interval
    );

    let state = AppState::from_config(&config).context("Failed to create cache")?;
    let capabilities = state.cache.capabilities();
    info!(
        "Cache backend '{}' ready (sets: {}, expiry updates: {})",
        state.cache.backend(),
        capabilities.sets,
        capabilities.expiry_updates
    );

    shutdown_signal().await?;

    drop(state);
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}
