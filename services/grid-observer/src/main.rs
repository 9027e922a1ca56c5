//! Station observation gridder.
//!
//! Interpolates archived monitoring-station measurements onto the tile grid
//! of a configured region and writes the resulting table as JSON:
//! - Timestamps are normalized to the hour
//! - Tables are memoized in `<cache-dir>/observes.sqlite`
//! - Temperature and wind also draw on the region's supplementary network
//!   unless `--no-supplement` is given
//! - Variables without enough stations come out as empty columns

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use grid_common::parse_timestamp;
use observation::{default_items, ArchiveRetriever, GridObserver, OBSERVES_CACHE};
use storage::MemoCache;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ObserverConfig;

#[derive(Parser, Debug)]
#[command(name = "grid-observer")]
#[command(about = "Interpolate station observations onto a tile grid")]
struct Args {
    /// Region to grid (must be configured in regions.yaml or built in)
    #[arg(short, long, default_value = "kanagawa")]
    region: String,

    /// Observation time (RFC 3339, e.g. 2025-02-20T22:00:00+09:00)
    #[arg(short, long)]
    time: String,

    /// Tile zoom level
    #[arg(short, long, default_value = "12")]
    zoom: u32,

    /// Variables to grid (comma separated)
    #[arg(long, value_delimiter = ',')]
    items: Vec<String>,

    /// Leave out the region's supplementary station network
    #[arg(long)]
    no_supplement: bool,

    /// Configuration directory (regions.yaml, stations.yaml)
    #[arg(long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Directory for cache databases
    #[arg(long, env = "CACHE_DIR", default_value = "cache")]
    cache_dir: PathBuf,

    /// Archive root laid out as <source>/<variable>/<unix_time>/stations.json
    #[arg(long, env = "ARCHIVE_DIR", default_value = "archive")]
    archive_dir: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so the table can be piped from stdout.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let timestamp = parse_timestamp(&args.time).context("Invalid --time")?;
    let items = if args.items.is_empty() {
        default_items()
    } else {
        args.items.clone()
    };

    info!(
        region = %args.region,
        timestamp = %timestamp,
        zoom = args.zoom,
        supplement = !args.no_supplement,
        items = ?items,
        "Starting grid observer"
    );

    let config = ObserverConfig::load(&args.config_dir)?;
    let cache = MemoCache::open(&args.cache_dir, OBSERVES_CACHE)
        .await
        .with_context(|| format!("Failed to open cache in {}", args.cache_dir.display()))?;
    let retriever = Arc::new(ArchiveRetriever::new(args.archive_dir.clone()));

    let observer = GridObserver::new(config.regions, config.locations, retriever, cache);

    let table = observer
        .observe(
            &args.region,
            timestamp,
            args.zoom,
            !args.no_supplement,
            &items,
        )
        .await?
        .with_context(|| format!("Unknown region: {}", args.region))?;

    for item in &items {
        info!(
            item = %item,
            covered = table.covered(item),
            points = table.len(),
            "Column coverage"
        );
    }

    let json = serde_json::to_vec_pretty(&table.rows())?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = table.len(), "Wrote grid table");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            stdout.write_all(b"\n")?;
        }
    }

    let stats = observer.cache().stats().await;
    info!(
        hits = stats.hits,
        misses = stats.misses,
        stores = stats.stores,
        "Cache stats"
    );

    Ok(())
}
