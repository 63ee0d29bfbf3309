//! arednfw - AREDN firmware fetch tool
//!
//! Resolves firmware version specifiers for a device against the
//! downloads site and caches the verified images locally. Intended to be
//! driven by a provisioning pipeline: all results for a run are printed
//! together, and any failure exits nonzero with no partial output.

mod config;

use anyhow::{Context, Result};
use arednfw_core::{DeviceIdentity, FirmwareCache};
use arednfw_resolver::Resolver;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "arednfw")]
#[command(about = "Fetch and cache AREDN firmware for a device")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "arednfw.toml")]
    config: PathBuf,

    /// Device board family, as reported by device facts
    #[arg(long)]
    board: String,

    /// Device hardware type as reported, before normalization
    #[arg(long)]
    boardtype: String,

    /// Version specifiers: release, nightly, nightly-babel, or an
    /// explicit version string
    #[arg(required = true)]
    versions: Vec<String>,

    /// Override the downloads site base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = config::load_config(&args.config)?;
    if let Some(base_url) = args.base_url {
        config.fetch.base_url = base_url;
    }
    if let Some(dir) = args.cache_dir {
        config.cache.dir = dir.display().to_string();
    }

    let identity = DeviceIdentity::from_facts(&args.board, &args.boardtype)?;
    info!(
        board = %identity.board,
        hardware_type = %identity.hardware_type,
        "Resolving firmware"
    );

    let cache =
        FirmwareCache::open(&config.cache.dir).context("Failed to open firmware cache")?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;
    let resolver = Resolver::new(client, config.fetch.base_url, cache);

    let artifacts = resolver.resolve_batch(&identity, &args.versions).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
    } else {
        for artifact in &artifacts {
            println!(
                "{} {} ({} bytes, sha256 {})",
                artifact.version,
                artifact.file.display(),
                artifact.size,
                artifact.sha256
            );
        }
    }

    Ok(())
}
