// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The write-ahead log's event vocabulary.
//!
//! The DAG state engine never mutates the materialized step table
//! directly: it computes the [`Event`]s an operation implies, the WAL
//! persists them, and the same events are replayed to rebuild state after
//! a crash. This is what gives the step table its "never caught between
//! old and new status" durability guarantee (spec §4.1).

use serde::{Deserialize, Serialize};

use crate::status::Status;
use crate::step::StepId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A full pipeline bundle was admitted; one event covers the whole
    /// bundle so admission is all-or-nothing (spec §4.5).
    BundleAdmitted { steps: Vec<AdmittedStep> },

    /// A single step's status (and optionally msg/trace) changed.
    StatusChanged {
        id: StepId,
        status: Status,
        epoch: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        msg: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },

    /// Multiple steps transition to the same status atomically (used when
    /// a parent's completion promotes all of its children, and by the
    /// transitive cancel/reset walks).
    BulkStatusChanged { ids: Vec<StepId>, status: Status, epoch: i64 },

    /// The scheduler leased a set of steps: each moves to `working` with a
    /// fresh lease `epoch`.
    Leased { ids: Vec<StepId>, epoch: i64 },

    /// An admin/operator set or updated a tag's velocity cap.
    TagVelocitySet { tag: String, velocity: f64 },
}

/// One step as admitted into the bundle-level event; mirrors
/// [`crate::step::StepRecord`] but carries the initial status explicitly
/// since that is derived by the admitter, not stored on the `StepDef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmittedStep {
    pub id: StepId,
    pub priority: i64,
    pub scope: String,
    pub velocity: Option<f64>,
    pub tag: Option<String>,
    pub status: Status,
    pub epoch: i64,
    pub parents: Vec<StepId>,
    pub children: Vec<StepId>,
}
