// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Fair Scheduler's `selectReady` (spec §4.4): combines the store's
//! ordered candidate scan with tag-rate throttling, then leases the
//! admitted ids in one transaction.

use stepgraph_core::{Clock, StepId};
use stepgraph_storage::StepRecordStore;

use crate::error::EngineError;
use crate::rate_limiter::RateLimiter;

/// Lease reclamation horizon: a step in `working` longer than this is
/// treated as abandoned.
pub const LEASE_MS: i64 = 2 * 60 * 60 * 1000;

pub const DEFAULT_LIMIT: usize = 50;

/// Select and lease up to `limit` ready steps across `scopes` (index 0
/// preferred). The store's `select_candidates` already returns rows in
/// `(scopeRank, -priority, epoch)` order; this only needs to walk them
/// once, applying the tag cap, since the store materializes the whole
/// ordered scan rather than paging a live cursor — the spec's
/// `chunkSize` describes a storage-engine detail with no counterpart
/// for an in-memory table.
pub fn select_ready(
    store: &StepRecordStore,
    limiter: &RateLimiter,
    clock: &impl Clock,
    scopes: &[String],
    limit: usize,
    lease_ms: i64,
) -> Result<Vec<StepId>, EngineError> {
    let now = clock.epoch_ms();
    let candidates = store.select_candidates(scopes, now, lease_ms);

    let mut admitted = Vec::new();
    for candidate in candidates {
        if admitted.len() >= limit {
            break;
        }
        let velocity = candidate.tag.as_deref().and_then(|tag| store.tag_velocity(tag));
        if limiter.try_admit(candidate.tag.as_deref(), velocity) {
            admitted.push(candidate.id);
        }
    }

    store.lease(admitted.clone(), now)?;
    Ok(admitted)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
