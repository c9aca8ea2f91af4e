// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Pipeline Admitter (spec §4.5): accepts an already-parsed bundle of
//! step definitions plus its starter set, persists each definition to the
//! blob store, and writes the step records in one transaction.

use std::collections::{HashMap, HashSet};

use stepgraph_core::{AdmittedStep, Clock, StepDef, StepId, Status};
use stepgraph_storage::{step_def_key, BlobStore, StepRecordStore};

use crate::error::EngineError;

/// Admit a parsed pipeline bundle. Step definitions are written to the
/// blob store first; the step records are then written as a single
/// all-or-nothing transaction. A duplicate id against an already-known
/// step rejects the whole bundle with [`EngineError::AdmissionConflict`].
pub async fn admit(
    store: &StepRecordStore,
    blobs: &dyn BlobStore,
    clock: &impl Clock,
    steps: HashMap<StepId, StepDef>,
    starters: HashSet<StepId>,
) -> Result<(), EngineError> {
    let now = clock.epoch_ms();

    for (id, def) in &steps {
        let bytes = serde_json::to_vec(def).map_err(|e| EngineError::StoreIo(std::io::Error::other(e)))?;
        blobs.set(&step_def_key(id.as_str()), bytes).await?;
    }

    let admitted = steps
        .into_values()
        .map(|def| AdmittedStep {
            status: if starters.contains(&def.id) { Status::Pending } else { Status::Queued },
            id: def.id,
            priority: def.priority,
            scope: def.scope,
            velocity: def.velocity,
            tag: def.tag,
            epoch: now,
            parents: def.parents,
            children: def.children,
        })
        .collect();

    store.admit_bundle(admitted)?;
    Ok(())
}

#[cfg(test)]
#[path = "admitter_tests.rs"]
mod tests;
