//! One-shot command handlers: health probe, start, stop.

use crate::cli::{watch::load_config_with_overrides, HealthArgs, StartArgs, StopArgs};
use crate::client::ControllerClient;
use crate::model::VideoSource;
use colored::Colorize;

fn client_from(config_path: &std::path::Path, base_url: Option<&str>) -> anyhow::Result<ControllerClient> {
    let config = load_config_with_overrides(config_path, base_url, None)?;
    let timeout = config.backend.timeout();
    Ok(ControllerClient::new(config.backend.base_url, timeout))
}

/// Handle `flowsense health`: probe once, print the verdict.
pub async fn run_health(args: HealthArgs) -> anyhow::Result<()> {
    let client = client_from(&args.config, args.base_url.as_deref())?;

    match client.health().await {
        Ok(health) if health.is_ok() => {
            println!("{} {}", "Connected:".green().bold(), health.message);
            Ok(())
        }
        Ok(health) => {
            anyhow::bail!("backend reachable but reported status '{}'", health.status)
        }
        Err(failure) => anyhow::bail!("{}", failure.user_message()),
    }
}

/// Handle `flowsense start`: dispatch a start command and report the ack.
pub async fn run_start(args: StartArgs) -> anyhow::Result<()> {
    let client = client_from(&args.config, args.base_url.as_deref())?;
    let source = VideoSource::from(args.video);

    let label = match &source {
        VideoSource::Webcam => "live camera feed".to_string(),
        VideoSource::File(path) => path.clone(),
    };

    match client.start(&source).await {
        Ok(ack) if ack.success => {
            println!("{} processing {}", "Started".green().bold(), label);
            Ok(())
        }
        Ok(ack) => anyhow::bail!("controller rejected start: {}", ack.message),
        Err(failure) => anyhow::bail!("{}", failure.user_message()),
    }
}

/// Handle `flowsense stop`: dispatch a stop command and report the ack.
pub async fn run_stop(args: StopArgs) -> anyhow::Result<()> {
    let client = client_from(&args.config, args.base_url.as_deref())?;

    match client.stop().await {
        Ok(ack) if ack.success => {
            println!("{} processing", "Stopped".green().bold());
            Ok(())
        }
        Ok(ack) => anyhow::bail!("controller rejected stop: {}", ack.message),
        Err(failure) => anyhow::bail!("{}", failure.user_message()),
    }
}
