//! CLI module for the FlowSense dashboard client
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `watch` - Run the live dashboard session in the terminal
//! - `health` - Probe the controller's liveness endpoint once
//! - `start` - Ask the controller to start processing a video source
//! - `stop` - Ask the controller to stop processing
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch the junction against the default local controller
//! flowsense watch
//!
//! # Start processing a recorded video on a remote controller
//! flowsense start --base-url http://10.0.0.5:5000/api --video sample.mp4
//!
//! # Generate shell completions
//! flowsense completions bash > ~/.bash_completion.d/flowsense
//! ```

pub mod commands;
pub mod completions;
pub mod config;
pub mod output;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// FlowSense - adaptive traffic-signal dashboard client
#[derive(Parser, Debug)]
#[command(
    name = "flowsense",
    version,
    about = "Live dashboard client for an adaptive traffic-signal controller"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live dashboard session
    Watch(WatchArgs),
    /// Probe the controller's health endpoint once
    Health(HealthArgs),
    /// Ask the controller to start processing
    Start(StartArgs),
    /// Ask the controller to stop processing
    Stop(StopArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "flowsense.toml")]
    pub config: PathBuf,

    /// Override controller base URL
    #[arg(short, long, env = "FLOWSENSE_BASE_URL")]
    pub base_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FLOWSENSE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Render a single frame and exit instead of looping
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "flowsense.toml")]
    pub config: PathBuf,

    /// Override controller base URL
    #[arg(short, long, env = "FLOWSENSE_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to a video file on the controller host; omit to use the live
    /// camera feed
    #[arg(short, long)]
    pub video: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "flowsense.toml")]
    pub config: PathBuf,

    /// Override controller base URL
    #[arg(short, long, env = "FLOWSENSE_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct StopArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "flowsense.toml")]
    pub config: PathBuf,

    /// Override controller base URL
    #[arg(short, long, env = "FLOWSENSE_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "flowsense.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
