// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the storage layer (spec §7: `step-not-found`,
//! `store-io`).

use stepgraph_core::StepId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("step not found: {0}")]
    NotFound(StepId),

    #[error("blob store I/O error: {0}")]
    BlobIo(#[from] std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    #[error("admission conflict: step {0} already exists")]
    AdmissionConflict(StepId),
}

#[derive(Debug, Error)]
pub enum WalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt WAL entry at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
