//! Hauler Arbiter replay runner
//!
//! Seeds an in-memory store from a fixtures file, then arbitrates a stream of
//! intents and telemetry read from stdin, one JSON envelope per line:
//!
//! ```text
//! {"kind":"intent","haulerId":"HT-1","type":"START_SHIFT","requestedStatus":"QUEUING","deviceTime":"..."}
//! {"kind":"telemetry","haulerId":"HT-1","lat":-23.4,"lng":119.8,"bodyUp":true,"deviceTime":"..."}
//! ```
//!
//! Each input line produces one JSON outcome line on stdout. Logs go to stderr.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use hauler_arbiter::config::ArbiterConfig;
use hauler_arbiter::health::health_check;
use hauler_arbiter::records::{
    Cycle, HaulerId, HaulerProjection, Intent, Loader, TelemetryRecord,
};
use hauler_arbiter::retention::purge_stale_telemetry;
use hauler_arbiter::{Arbiter, InMemoryStore};

#[derive(Parser, Debug)]
#[command(name = "hauler-arbiter")]
#[command(about = "Arbitrate hauler intents and telemetry read from stdin")]
#[command(version)]
struct CliArgs {
    /// JSON file with `haulers`, `cycles` and `loaders` to seed the store
    #[arg(long, value_name = "FILE")]
    fixtures: Option<PathBuf>,

    /// TOML config file (default: $HAULER_ARBITER_CONFIG, then ./hauler_arbiter.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the health payload and exit
    #[arg(long)]
    health: bool,

    /// Run one telemetry retention sweep after stdin is drained
    #[arg(long)]
    purge: bool,

    /// Print the status path of every hauler seen after stdin is drained
    #[arg(long)]
    history: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    haulers: Vec<HaulerProjection>,
    #[serde(default)]
    cycles: Vec<Cycle>,
    #[serde(default)]
    loaders: Vec<Loader>,
}

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Envelope {
    Intent(Intent),
    Telemetry(TelemetryRecord),
}

fn parse_envelope(line: &str) -> serde_json::Result<Envelope> {
    serde_json::from_str(line)
}

/// Output line for input that is not a valid envelope.
fn malformed_report(line_no: usize, err: &serde_json::Error) -> serde_json::Value {
    json!({ "kind": "error", "line": line_no, "error": err.to_string() })
}

async fn seed(store: &InMemoryStore, path: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading fixtures {}", path.display()))?;
    let fixtures: Fixtures = serde_json::from_str(&raw)
        .with_context(|| format!("parsing fixtures {}", path.display()))?;

    info!(
        haulers = fixtures.haulers.len(),
        cycles = fixtures.cycles.len(),
        loaders = fixtures.loaders.len(),
        "seeding store"
    );
    for hauler in fixtures.haulers {
        store.put_hauler(hauler)?;
    }
    for cycle in fixtures.cycles {
        store.put_cycle(cycle)?;
    }
    for loader in fixtures.loaders {
        store.put_loader(loader)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ArbiterConfig::load_from_file(path)?,
        None => ArbiterConfig::load(),
    };

    if args.health {
        println!("{}", serde_json::to_string(&health_check(&config))?);
        return Ok(());
    }

    let store = Arc::new(InMemoryStore::new());
    if let Some(path) = &args.fixtures {
        seed(&store, path).await?;
    }
    let arbiter = Arbiter::new(store.clone(), config.clone());

    let mut seen: BTreeSet<HaulerId> = BTreeSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let report = match parse_envelope(line) {
            Ok(Envelope::Intent(intent)) => {
                seen.insert(intent.hauler_id.clone());
                let outcome = arbiter.handle_intent(&intent).await?;
                json!({ "kind": "intent", "intentId": intent.id, "outcome": outcome })
            }
            Ok(Envelope::Telemetry(record)) => {
                seen.insert(record.hauler_id.clone());
                store.insert_telemetry(record.clone())?;
                let outcome = arbiter.handle_telemetry(&record).await;
                json!({ "kind": "telemetry", "telemetryId": record.id, "outcome": outcome })
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed input line");
                malformed_report(line_no, &e)
            }
        };
        println!("{report}");
    }

    if args.purge {
        let deleted = purge_stale_telemetry(store.as_ref(), &config, Utc::now()).await?;
        println!("{}", json!({ "kind": "purge", "deleted": deleted }));
    }

    if args.history {
        for hauler_id in &seen {
            let history = arbiter.history(hauler_id).await?;
            println!(
                "{}",
                json!({
                    "kind": "history",
                    "haulerId": hauler_id,
                    "path": history.get_path(),
                    "events": history.len(),
                    "contiguous": history.is_contiguous(),
                })
            );
        }
    }

    Ok(())
}
