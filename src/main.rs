//! Wande-Chef main entry point
//!
//! This is the command-line interface for the Funda Wande catalog ingester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use wande_chef::config::{load_config_with_hash, Config};
use wande_chef::crawler::Coordinator;
use tracing_subscriber::EnvFilter;

/// Wande-Chef: an educational catalog ingester
///
/// Wande-Chef crawls the Funda Wande document and video listings, keeps
/// every document within the publishing size budget, and writes the
/// resulting topic tree as a channel manifest.
#[derive(Parser, Debug)]
#[command(name = "wande-chef")]
#[command(version)]
#[command(about = "Funda Wande catalog ingester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl and assemble without downloading or publishing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load(cli.config.as_ref())?;

    let mut coordinator = Coordinator::new(config).context("Failed to initialize")?;
    coordinator.set_config_hash(config_hash);

    match coordinator.run(cli.dry_run).await {
        Ok(channel) => {
            tracing::info!(
                "Channel '{}' ready with {} topics",
                channel.title,
                channel.children.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<(Config, String)> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok((Config::default(), String::from("defaults")));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("Invalid configuration in {}", path.display()))
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wande_chef=info,warn"),
            1 => EnvFilter::new("wande_chef=debug,info"),
            2 => EnvFilter::new("wande_chef=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
