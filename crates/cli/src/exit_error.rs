// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Carries a process exit code alongside an error message, so `main`
//! decides how the process terminates instead of commands calling
//! `std::process::exit` directly.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<stepgraph_engine::EngineError> for ExitError {
    fn from(err: stepgraph_engine::EngineError) -> Self {
        ExitError::new(1, err.to_string())
    }
}

impl From<stepgraph_storage::StorageError> for ExitError {
    fn from(err: stepgraph_storage::StorageError) -> Self {
        ExitError::new(1, err.to_string())
    }
}

impl From<serde_json::Error> for ExitError {
    fn from(err: serde_json::Error) -> Self {
        ExitError::new(1, format!("invalid bundle JSON: {err}"))
    }
}

impl From<std::io::Error> for ExitError {
    fn from(err: std::io::Error) -> Self {
        ExitError::new(1, err.to_string())
    }
}
