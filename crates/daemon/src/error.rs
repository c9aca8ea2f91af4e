// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level error taxonomy (spec §7), collapsing the lower layers'
//! errors into the vocabulary a connection handler acts on. Nothing here
//! ever unwinds the accept loop: [`crate::handler::handle_connection`]
//! matches on this type and decides how to respond (or not respond).

use stepgraph_engine::EngineError;
use stepgraph_wire::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("step not found")]
    StepNotFound,

    #[error("admission conflict")]
    AdmissionConflict,

    #[error("store I/O error: {0}")]
    StoreIo(std::io::Error),
}

impl From<EngineError> for DaemonError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::StepNotFound(_) => DaemonError::StepNotFound,
            EngineError::AdmissionConflict(_) => DaemonError::AdmissionConflict,
            EngineError::StoreIo(e) => DaemonError::StoreIo(e),
        }
    }
}

impl DaemonError {
    /// Store-io is the only kind spec §7 names as retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DaemonError::StoreIo(_))
    }
}
