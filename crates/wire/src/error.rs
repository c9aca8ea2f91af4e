// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol error taxonomy (spec §7: `protocol-malformed`,
//! `unknown-method`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
