use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pado::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "pado",
    version,
    about = "WavePark session availability watcher with Telegram/webhook alerts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to logging.format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the page once, notify about new or increased slots, save the baseline
    Check {
        /// Report what would be sent without notifying or saving
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Parse a saved HTML snapshot and print the reconstructed slots
    Parse {
        /// HTML file to parse
        #[arg(long)]
        html: PathBuf,
    },

    /// Print the stored baseline
    Baseline,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&format, &config.logging.level, cli.verbose)?;

    tracing::info!(config = ?cli.config, "pado starting");

    match cli.command {
        Commands::Check { dry_run } => commands::check(config, dry_run).await?,
        Commands::Parse { html } => commands::parse(config, html).await?,
        Commands::Baseline => commands::baseline(config).await?,
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("pado=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("pado={level},warn"))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
