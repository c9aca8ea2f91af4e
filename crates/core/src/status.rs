// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step status state machine.

use serde::{Deserialize, Serialize};

/// Status of a step record.
///
/// `Reset` is carried over from the reference implementation's status
/// enum but is never assigned by the DAG state engine: a `reset` operation
/// resolves each visited step to `Pending` or `Queued` depending on
/// whether it has parents (see [`crate::event::Event`]). It is kept here
/// so the on-the-wire/on-disk representation matches the field list the
/// spec documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    Pending,
    Working,
    Success,
    Cancel,
    Reset,
    Error,
}

impl Status {
    /// Terminal statuses are never further transitioned by the engine.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Cancel | Status::Error)
    }

    /// Statuses counted as "finished" for blob GC purposes (§4.3): a
    /// component is collectible only once every member is `success` or
    /// `cancel` — `error` does NOT count, matching the reference (an
    /// errored step keeps its payload around for inspection).
    pub fn is_gc_eligible(self) -> bool {
        matches!(self, Status::Success | Status::Cancel)
    }
}

crate::simple_display! {
    Status {
        Queued => "queued",
        Pending => "pending",
        Working => "working",
        Success => "success",
        Cancel => "cancel",
        Reset => "reset",
        Error => "error",
    }
}
