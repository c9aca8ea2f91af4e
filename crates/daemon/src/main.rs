// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `stepgraphd`: the coordinator binary. Loads configuration from the
//! environment, opens the step-record store and blob store under its
//! data directory, and serves the wire protocol until interrupted.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use stepgraph_daemon::{init_logging, Config, Server};
use stepgraph_storage::{FsBlobStore, StepRecordStore};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(config.blob_root())?;

    let store = Arc::new(
        StepRecordStore::open(config.wal_path())
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let blobs = Arc::new(FsBlobStore::new(config.blob_root()));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received interrupt, shutting down");
        signal_token.cancel();
    });

    let server = Server::new(config, store, blobs);
    server.run(shutdown).await
}
