// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blob garbage collection (spec §4.3): triggered at the end of `done`
//! and `cancel`, reclaims a step's payload once its entire weakly
//! connected component has reached a terminal, GC-eligible status.
//! Step records themselves are never deleted — only `step-data/{id}`
//! blobs.

use stepgraph_core::StepId;
use stepgraph_storage::{step_data_key, BlobStore, StepRecordStore};

use crate::dag::connected_component;
use crate::error::EngineError;

/// Collect the component seeded at `id`, if every member is GC-eligible.
pub async fn collect(
    store: &StepRecordStore,
    blobs: &dyn BlobStore,
    id: StepId,
) -> Result<(), EngineError> {
    let component = connected_component(store, id);

    let all_eligible = store.with_state(|state| {
        component.iter().all(|member| {
            state.steps.get(member).map(|s| s.status.is_gc_eligible()).unwrap_or(false)
        })
    });
    if !all_eligible {
        return Ok(());
    }

    for member in &component {
        blobs.delete(&step_data_key(member.as_str())).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
