// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The DAG state engine's transition operations (spec §4.2): `done`,
//! `pending` (soft retry), `cancel`, `reset`, `error`. Each computes the
//! events an operation implies by reading the current [`MaterializedState`]
//! snapshot through the store, then applies them via the store's atomic
//! per-status-group writes.

use std::collections::HashSet;

use stepgraph_core::{Clock, StepId, StepRecord, Status};
use stepgraph_storage::StepRecordStore;

use crate::error::EngineError;
use crate::gc;

/// `done(id)`: the step succeeded. Promotes every child whose parents have
/// now all succeeded to `pending`, then runs blob GC seeded at `id`.
pub async fn done(
    store: &StepRecordStore,
    blobs: &dyn stepgraph_storage::BlobStore,
    clock: &impl Clock,
    id: StepId,
) -> Result<(), EngineError> {
    let now = clock.epoch_ms();
    store.update_status(id, Status::Success, now, None, None)?;

    let promotable = store.with_state(|state| {
        let Some(step) = state.steps.get(&id) else { return Vec::new() };
        step.children
            .iter()
            .filter(|child_id| {
                state
                    .steps
                    .get(child_id)
                    .map(|child| child.all_parents_succeeded(|p| state.status_of(p)))
                    .unwrap_or(false)
            })
            .copied()
            .collect::<Vec<_>>()
    });
    store.bulk_set_status(promotable, Status::Pending, now)?;

    gc::collect(store, blobs, id).await?;
    Ok(())
}

/// `pending(id)`: a soft retry reported by the worker. Does not touch
/// children.
pub fn soft_retry(store: &StepRecordStore, clock: &impl Clock, id: StepId) -> Result<(), EngineError> {
    let now = clock.epoch_ms();
    store.update_status(id, Status::Pending, now, None, None)?;
    Ok(())
}

/// `error(id, msg, trace)`: terminal, no propagation.
pub fn report_error(
    store: &StepRecordStore,
    clock: &impl Clock,
    id: StepId,
    msg: Option<String>,
    trace: Option<String>,
) -> Result<(), EngineError> {
    let now = clock.epoch_ms();
    store.update_status(id, Status::Error, now, msg, trace)?;
    Ok(())
}

/// `cancel(id)`: bidirectional transitive closure over parents and
/// children, every visited step set to `cancel`, then blob GC seeded at
/// `id`.
pub async fn cancel(
    store: &StepRecordStore,
    blobs: &dyn stepgraph_storage::BlobStore,
    clock: &impl Clock,
    id: StepId,
) -> Result<(), EngineError> {
    let now = clock.epoch_ms();
    let visited = connected_component(store, id);
    store.bulk_set_status(visited, Status::Cancel, now)?;
    gc::collect(store, blobs, id).await?;
    Ok(())
}

/// `reset(id)`: the same bidirectional walk as `cancel`, but each visited
/// step resolves to `pending` if it has parents, else `queued` (starters
/// go back to `queued` since ordinary promotion only happens via parent
/// completion).
pub fn reset(store: &StepRecordStore, clock: &impl Clock, id: StepId) -> Result<(), EngineError> {
    let now = clock.epoch_ms();
    let visited = connected_component(store, id);

    let (starters, rest): (Vec<StepId>, Vec<StepId>) = store.with_state(|state| {
        visited.into_iter().partition(|visited_id| {
            state.steps.get(visited_id).map(StepRecord::is_starter).unwrap_or(false)
        })
    });

    store.bulk_set_status(starters, Status::Queued, now)?;
    store.bulk_set_status(rest, Status::Pending, now)?;
    Ok(())
}

/// Weakly connected component over the parent/child relation, seeded at
/// `id`: DFS both directions, accumulating a visited set (spec §4.3).
pub(crate) fn connected_component(store: &StepRecordStore, seed: StepId) -> Vec<StepId> {
    store.with_state(|state| {
        let mut visited = HashSet::new();
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(step) = state.steps.get(&current) {
                stack.extend(step.parents.iter().copied());
                stack.extend(step.children.iter().copied());
            }
        }
        visited.into_iter().collect()
    })
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
