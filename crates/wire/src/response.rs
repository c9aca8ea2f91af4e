// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response encoding.
//!
//! `get-steps` is the only method with a reply: the leased step ids as a
//! JSON array, framed with [`crate::frame::write_frame`] like any other
//! frame. Every mutating method (`done`, `pending`, `cancel`, `reset`,
//! `error`) replies with nothing at all. An unknown method gets the
//! literal string below, written without a frame terminator.

use stepgraph_core::StepId;

use crate::error::ProtocolError;

/// Sent verbatim, with no frame terminator, for an unrecognized method.
pub const UNKNOWN_METHOD_MESSAGE: &[u8] = b"Unknown method.";

/// JSON-encode the leased step ids returned by `get-steps`.
pub fn encode_steps(ids: &[StepId]) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(ids).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
