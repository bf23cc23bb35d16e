//! Watch command implementation

use crate::cli::{output, WatchArgs};
use crate::client::ControllerClient;
use crate::config::{ClientConfig, LogFormat, LoggingConfig};
use crate::sync::DashboardSession;
use anyhow::Context;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    config_path: &Path,
    base_url: Option<&str>,
    log_level: Option<&str>,
) -> anyhow::Result<ClientConfig> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if config_path.exists() {
        ClientConfig::load(Some(config_path))
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ClientConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(base_url) = base_url {
        config.backend.base_url = base_url.to_string();
    }
    if let Some(log_level) = log_level {
        config.logging.level = log_level.to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;
        }
    }

    Ok(())
}

/// Build a session from config and run the live dashboard until interrupted.
pub async fn run_watch(args: WatchArgs) -> anyhow::Result<()> {
    let config = load_config_with_overrides(
        &args.config,
        args.base_url.as_deref(),
        args.log_level.as_deref(),
    )?;
    init_tracing(&config.logging)?;

    let client = ControllerClient::new(config.backend.base_url.clone(), config.backend.timeout());
    let session = DashboardSession::new(client, config.poll.clone());

    tracing::info!(base_url = %config.backend.base_url, "dashboard session starting");
    session.check_health().await;

    if args.once {
        // Single frame: fetch both feeds once, render, and tear down
        session.poll_status_once().await;
        session.poll_history_once().await;
        println!("{}", output::render_dashboard(&session.store().state()));
        session.dispose();
        return Ok(());
    }

    let handles = session.start();
    let store = session.store();
    let mut render_timer = tokio::time::interval(config.poll.status_interval());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                break;
            }
            _ = render_timer.tick() => {
                // Clear the screen and repaint the frame
                print!("\x1b[2J\x1b[H");
                println!("{}", output::render_dashboard(&store.state()));
            }
        }
    }

    session.dispose();
    for handle in handles {
        let _ = handle.await;
    }
    Ok(())
}
