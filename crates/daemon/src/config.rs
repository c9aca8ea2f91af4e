// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration, assembled from environment variables
//! (spec §6.5) with documented defaults. Loaded once at startup and
//! never re-read; there is no hot-reload concept.

use std::path::PathBuf;

/// Default bind host, matching the reference implementation exactly.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port, matching the reference implementation exactly.
pub const DEFAULT_PORT: u16 = 65432;
/// Default lease reclamation horizon, per spec §4.4 (matches
/// [`stepgraph_engine::LEASE_MS`]). Exposed as a knob per the Open
/// Question in spec §9 rather than hard-coded.
const DEFAULT_LEASE_SECS: u64 = (stepgraph_engine::LEASE_MS / 1000) as u64;
const DEFAULT_LIMIT: usize = stepgraph_engine::DEFAULT_LIMIT;
const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding the step-record WAL (`steps.wal`) and the blob
    /// store's root (`blobs/`).
    pub data_dir: PathBuf,
    /// Lease reclamation horizon, in milliseconds.
    pub lease_ms: i64,
    /// Max ids returned by a single `get-steps` call.
    pub limit: usize,
    /// Number of handler-pool tasks draining the connection queue.
    pub workers: usize,
}

impl Config {
    /// Read configuration from the environment, falling back to the
    /// documented defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("PIPELINE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: std::env::var("PIPELINE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_dir: std::env::var("STEPGRAPH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./stepgraph-data")),
            lease_ms: std::env::var("STEPGRAPH_LEASE_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_LEASE_SECS) as i64
                * 1000,
            limit: std::env::var("STEPGRAPH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LIMIT),
            workers: std::env::var("STEPGRAPH_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WORKERS),
        }
    }

    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join("steps.wal")
    }

    pub fn blob_root(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
