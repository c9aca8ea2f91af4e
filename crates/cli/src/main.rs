// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `stepgraphctl`: a thin client that drives the admitter and step
//! record store directly against a shared data directory (spec §6.5
//! supplement) — it does not speak the wire protocol itself, since that
//! surface is for workers, not operators.

mod bundle;
mod exit_error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stepgraph_core::{StepId, SystemClock};
use stepgraph_storage::{FsBlobStore, StepRecordStore};

use bundle::Bundle;
use exit_error::ExitError;

/// Default data directory, matching `stepgraphd`'s own default so a CLI
/// invocation against a locally-running coordinator needs no flags.
const DEFAULT_DATA_DIR: &str = "./stepgraph-data";

#[derive(Parser)]
#[command(name = "stepgraphctl", about = "Admit pipeline bundles and inspect step status")]
struct Cli {
    /// Directory holding the coordinator's WAL and blob store.
    #[arg(long, global = true, env = "STEPGRAPH_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Admit a pre-parsed pipeline bundle (a `{steps, starters}` JSON file).
    Admit {
        /// Path to the bundle JSON file.
        bundle: PathBuf,
    },
    /// Print one step's current record as JSON.
    Status {
        /// The step id to look up.
        id: String,
    },
    /// List every step, optionally filtered to one scope.
    List {
        /// Only show steps in this scope.
        #[arg(long)]
        scope: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    std::fs::create_dir_all(&cli.data_dir)?;
    let blob_root = cli.data_dir.join("blobs");
    std::fs::create_dir_all(&blob_root)?;

    let store = StepRecordStore::open(cli.data_dir.join("steps.wal"))?;
    let blobs = FsBlobStore::new(blob_root);

    match cli.command {
        Command::Admit { bundle } => admit_bundle(&store, &blobs, &bundle).await,
        Command::Status { id } => print_status(&store, &id),
        Command::List { scope } => print_list(&store, scope.as_deref()),
    }
}

async fn admit_bundle(store: &StepRecordStore, blobs: &FsBlobStore, path: &std::path::Path) -> Result<(), ExitError> {
    let bundle = Bundle::load(path)?;
    let count = bundle.steps.len();
    stepgraph_engine::admit(store, blobs, &SystemClock, bundle.steps, bundle.starters).await?;
    println!("admitted {count} step(s)");
    Ok(())
}

fn print_status(store: &StepRecordStore, id: &str) -> Result<(), ExitError> {
    let step = store.get(&StepId::from_string(id))?;
    let json = serde_json::to_string_pretty(&step)?;
    println!("{json}");
    Ok(())
}

fn print_list(store: &StepRecordStore, scope: Option<&str>) -> Result<(), ExitError> {
    let rows = store.with_state(|state| {
        let mut rows: Vec<_> = state
            .steps
            .values()
            .filter(|s| scope.map(|wanted| s.scope == wanted).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        rows
    });

    if rows.is_empty() {
        println!("no steps");
        return Ok(());
    }
    println!("{:<24} {:<10} {:<10} {:>8}", "id", "status", "scope", "priority");
    for step in rows {
        println!("{:<24} {:<10} {:<10} {:>8}", step.id.as_str(), step.status.to_string(), step.scope, step.priority);
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
