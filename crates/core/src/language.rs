// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step body language tag.
//!
//! The coordinator never interprets a step's body — only the worker's
//! executor does — so this is a closed, inert tag. Collapsing the original
//! per-language dynamic dispatch into one enum keeps the coordinator from
//! ever branching on it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Postgres,
    Sqlite3,
}

crate::simple_display! {
    Language {
        Python => "python",
        Postgres => "postgres",
        Sqlite3 => "sqlite3",
    }
}
