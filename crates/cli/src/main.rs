mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pedantix_core::{load_config, load_default_config, validate_config, Config, ConfigError};

/// Config file used when neither `--config` nor `PEDANTIX_CONFIG` is set.
const DEFAULT_CONFIG_PATH: &str = "pedantix.toml";

#[derive(Debug, Parser)]
#[command(name = "pedantix", version, about = "Solve masked article title puzzles")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "PEDANTIX_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index a JSON Lines corpus into a snapshot.
    Build {
        /// Corpus file, one `{"title", "text"}` object per line.
        #[arg(long)]
        corpus: PathBuf,

        /// Snapshot destination (defaults to `index.snapshot_path`).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Solve the current puzzle against the live site.
    Solve {
        /// Snapshot to load (defaults to `index.snapshot_path`).
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Skip waiting for the daily release.
        #[arg(long)]
        now: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.json_logs);

    let config = resolve_config(cli.config)?;

    match cli.command {
        Command::Build { corpus, output } => {
            let output = output.unwrap_or_else(|| config.index.snapshot_path.clone());
            let stats = commands::build(&config, &corpus, &output).await?;
            info!(
                nodes = stats.nodes,
                leaves = stats.leaves,
                titles = stats.titles,
                "Snapshot written to {:?}",
                output
            );
        }
        Command::Solve { snapshot, now } => {
            let snapshot = snapshot.unwrap_or_else(|| config.index.snapshot_path.clone());
            let resolution = commands::solve(&config, &snapshot, !now).await?;
            println!("{}", commands::summary(&resolution));
        }
    }

    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Load and validate the configuration.
///
/// An explicit path must exist. The default path may be absent, in which
/// case built-in defaults (plus environment overrides) are used.
fn resolve_config(explicit: Option<PathBuf>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            match load_config(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(ConfigError::FileNotFound(_)) => {
                    info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                    load_default_config().context("Failed to apply environment overrides")?
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to load config from {:?}", path))
                }
            }
        }
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}
