// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the DAG state engine (spec §7).

use stepgraph_core::StepId;
use stepgraph_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("step not found: {0}")]
    StepNotFound(StepId),

    #[error("store I/O error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("admission conflict: step {0} already exists")]
    AdmissionConflict(StepId),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => EngineError::StepNotFound(id),
            StorageError::AdmissionConflict(id) => EngineError::AdmissionConflict(id),
            StorageError::BlobIo(e) => EngineError::StoreIo(e),
            StorageError::Wal(wal_err) => {
                EngineError::StoreIo(std::io::Error::other(wal_err.to_string()))
            }
        }
    }
}
