// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step identifiers, the persisted step record, and the admitted step
//! definition DTO.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::status::Status;

crate::define_id! {
    /// Opaque unique identifier for a step, assigned at admission.
    pub struct StepId("stp-");
}

/// The fundamental persistent entity (spec §3.1).
///
/// A step's body (code, function name, language tag, kwargs) lives in the
/// blob store under `step/{id}`; this record never duplicates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub id: StepId,
    pub priority: i64,
    pub scope: String,
    pub velocity: Option<f64>,
    pub tag: Option<String>,
    pub status: Status,
    /// Wall-clock timestamp (ms since epoch) of the last status transition.
    pub epoch: i64,
    pub msg: Option<String>,
    pub trace: Option<String>,
    pub parents: Vec<StepId>,
    pub children: Vec<StepId>,
}

impl StepRecord {
    /// True once every parent has succeeded (the invariant `pending` implies).
    pub fn all_parents_succeeded(&self, lookup: impl Fn(&StepId) -> Option<Status>) -> bool {
        self.parents.iter().all(|p| lookup(p) == Some(Status::Success))
    }

    pub fn is_starter(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Step definition admitted from an already-parsed pipeline bundle
/// (spec §6.3). The coordinator treats `code`, `func`, and `kwargs` as
/// opaque bytes it never reads; it only needs the scheduling-relevant
/// fields to build a [`StepRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    pub id: StepId,
    pub name: String,
    pub language: Language,
    pub func: String,
    pub code: String,
    #[serde(default)]
    pub kwargs: HashMap<String, serde_json::Value>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub velocity: Option<f64>,
    #[serde(default)]
    pub parents: Vec<StepId>,
    #[serde(default)]
    pub children: Vec<StepId>,
}

fn default_scope() -> String {
    "default".to_string()
}
