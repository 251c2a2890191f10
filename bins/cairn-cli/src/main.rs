//! cairn-cli — Inspect and exercise the compiled-in checkpoint gate.
//!
//! Lists the active checkpoint table, verifies a `(height, hash)` pair against
//! it, and reports chain-length and verification-progress estimates.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use cairn_checkpoints::{CheckpointConfig, CheckpointData, Checkpoints};
use cairn_core::constants::NetworkType;
use cairn_core::types::{BlockIndexEntry, Hash256};

/// Cairn checkpoint gate command-line interface.
#[derive(Parser, Debug)]
#[command(name = "cairn-cli")]
#[command(version, about = "Checkpoint verification and sync-progress estimates")]
struct Cli {
    /// Config file (TOML). Defaults to <config dir>/cairn/cairn.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the test network's checkpoint table.
    #[arg(long, global = true)]
    testnet: bool,

    /// Disable checkpoint enforcement.
    #[arg(long, global = true)]
    no_checkpoints: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the active checkpoint table and its metadata.
    List {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Check a block hash against the checkpoint pinned at its height.
    Verify {
        /// Block height.
        #[arg(long)]
        height: u64,
        /// Block hash (hex, optional 0x prefix).
        #[arg(long)]
        hash: Hash256,
    },
    /// Print the lower-bound estimate of the chain length.
    Estimate,
    /// Estimate verification progress at a block.
    Progress {
        /// Cumulative transaction count through the block.
        #[arg(long)]
        tx_count: u64,
        /// Block timestamp (Unix seconds).
        #[arg(long)]
        time: u64,
        /// Current time (Unix seconds). Defaults to the system clock.
        #[arg(long)]
        now: Option<u64>,
    },
    /// Find the highest checkpoint present in a block index dump.
    Last {
        /// JSON file holding an array of block index entries.
        #[arg(long)]
        index: PathBuf,
    },
}

/// JSON view of the active table for `list --json`.
#[derive(Serialize)]
struct TableReport<'a> {
    network: NetworkType,
    enforced: bool,
    #[serde(flatten)]
    data: &'a CheckpointData,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let config = resolve_config(&cli)?;
    info!(
        network = %config.network,
        checkpoints = config.checkpoints,
        "checkpoint gate configured"
    );
    let checkpoints = Checkpoints::from_config(&config);

    match cli.command {
        Commands::List { json } => list(&checkpoints, config.network, json),
        Commands::Verify { height, hash } => verify(&checkpoints, height, &hash),
        Commands::Estimate => {
            println!("{}", checkpoints.total_blocks_estimate());
            Ok(())
        }
        Commands::Progress { tx_count, time, now } => {
            println!("{:.6}", progress(&checkpoints, tx_count, time, now));
            Ok(())
        }
        Commands::Last { index } => last(&checkpoints, &index),
    }
}

/// Merge the config file and environment with command-line overrides.
fn resolve_config(cli: &Cli) -> Result<CheckpointConfig> {
    let mut config =
        CheckpointConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.testnet {
        config.network = NetworkType::Testnet;
    }
    if cli.no_checkpoints {
        config.checkpoints = false;
    }
    Ok(config)
}

fn list(checkpoints: &Checkpoints<'_>, network: NetworkType, json: bool) -> Result<()> {
    let data = checkpoints.data();
    if json {
        let report = TableReport {
            network,
            enforced: checkpoints.is_enforced(),
            data,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode table")?
        );
    } else {
        print!("{}", list_text(checkpoints, network));
    }
    Ok(())
}

/// Human-readable table listing, one checkpoint per line.
fn list_text(checkpoints: &Checkpoints<'_>, network: NetworkType) -> String {
    let data = checkpoints.data();
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Network: {network}");
    let _ = writeln!(out, "Enforced: {}", checkpoints.is_enforced());
    if data.table.is_placeholder() {
        let _ = writeln!(out, "(placeholder table: no real checkpoints)");
    }
    for (height, hash) in data.table.iter() {
        let _ = writeln!(out, "{height:>10}  {hash}");
    }
    let last_time = i64::try_from(data.last_checkpoint_time)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| data.last_checkpoint_time.to_string());
    let _ = writeln!(out, "Last checkpoint time: {last_time}");
    let _ = writeln!(
        out,
        "Transactions through last checkpoint: {}",
        data.last_checkpoint_tx_count
    );
    let _ = writeln!(out, "Expected transactions per day: {}", data.tx_per_day);
    out
}

fn verify(checkpoints: &Checkpoints<'_>, height: u64, hash: &Hash256) -> Result<()> {
    checkpoints
        .check(height, hash)
        .with_context(|| format!("Block {hash} rejected at height {height}"))?;
    println!("ok");
    Ok(())
}

fn last(checkpoints: &Checkpoints<'_>, path: &Path) -> Result<()> {
    let index = load_index(path)?;
    match checkpoints.last_checkpoint(&index) {
        Some(entry) => println!(
            "{}",
            serde_json::to_string_pretty(entry).context("Failed to encode entry")?
        ),
        None => println!("none"),
    }
    Ok(())
}

/// Progress of a block with `tx_count` cumulative transactions and timestamp
/// `time`, sampled at `now` or at the system clock when absent.
fn progress(checkpoints: &Checkpoints<'_>, tx_count: u64, time: u64, now: Option<u64>) -> f64 {
    let now = now.unwrap_or_else(unix_now);
    let node = BlockIndexEntry {
        height: 0,
        hash: Hash256::ZERO,
        chain_tx: tx_count,
        time,
    };
    debug!(tx_count, time, now, "estimating progress");
    checkpoints.guess_progress(Some(&node), now)
}

/// Read a JSON array of block index entries, keyed by hash.
fn load_index(path: &Path) -> Result<HashMap<Hash256, BlockIndexEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index: {}", path.display()))?;
    let entries: Vec<BlockIndexEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse index: {}", path.display()))?;
    debug!(entries = entries.len(), "loaded block index");
    Ok(entries.into_iter().map(|e| (e.hash, e)).collect())
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
