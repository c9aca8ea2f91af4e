// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Step Record Store (spec §4.1): a WAL-backed, mutex-guarded step
//! table. Every mutation appends an event, flushes it, and only then
//! folds it into the in-memory [`MaterializedState`] — so a crash between
//! "appended" and "folded" is invisible: the next `open` replays the same
//! event and arrives at the same state.

use std::path::Path;

use parking_lot::Mutex;

use stepgraph_core::{AdmittedStep, Event, StepId, StepRecord, Status};

use crate::error::StorageError;
use crate::state::MaterializedState;
use crate::wal::Wal;

struct Inner {
    wal: Wal,
    state: MaterializedState,
}

pub struct StepRecordStore {
    inner: Mutex<Inner>,
}

impl StepRecordStore {
    /// Open (or create) the store's WAL at `path` and replay it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let (wal, entries) = Wal::open(path)?;
        let mut state = MaterializedState::new();
        for entry in &entries {
            state.apply_event(&entry.event);
        }
        Ok(Self { inner: Mutex::new(Inner { wal, state }) })
    }

    /// Run a read-only closure against the current materialized state,
    /// e.g. for the GC/DAG walks in the engine crate that need to see the
    /// whole step table rather than one row at a time.
    pub fn with_state<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        let guard = self.inner.lock();
        f(&guard.state)
    }

    fn append(&self, inner: &mut Inner, event: Event) -> Result<(), StorageError> {
        inner.wal.append(&event)?;
        inner.wal.flush()?;
        inner.state.apply_event(&event);
        Ok(())
    }

    /// Admit a whole pipeline bundle as a single transaction (spec §4.5).
    /// Fails with [`StorageError::AdmissionConflict`] if any id is already
    /// known — the reference's open question about same-id/different-scope
    /// admission is resolved this way (see the design notes).
    pub fn admit_bundle(&self, steps: Vec<AdmittedStep>) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        for step in &steps {
            if inner.state.steps.contains_key(&step.id) {
                return Err(StorageError::AdmissionConflict(step.id));
            }
        }
        self.append(&mut inner, Event::BundleAdmitted { steps })
    }

    pub fn get(&self, id: &StepId) -> Result<StepRecord, StorageError> {
        self.inner.lock().state.steps.get(id).cloned().ok_or(StorageError::NotFound(*id))
    }

    pub fn update_status(
        &self,
        id: StepId,
        status: Status,
        epoch: i64,
        msg: Option<String>,
        trace: Option<String>,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        self.append(&mut inner, Event::StatusChanged { id, status, epoch, msg, trace })
    }

    /// Atomic multi-row transition, used when a parent's completion
    /// promotes every child in one go.
    pub fn bulk_set_status(&self, ids: Vec<StepId>, status: Status, epoch: i64) -> Result<(), StorageError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.lock();
        self.append(&mut inner, Event::BulkStatusChanged { ids, status, epoch })
    }

    /// Lease a set of candidate ids: set each to `working` at `epoch`, in
    /// one transaction. Called by the scheduler after it has applied
    /// scope/priority ordering and tag-rate throttling to a
    /// [`Self::select_candidates`] scan.
    pub fn lease(&self, ids: Vec<StepId>, epoch: i64) -> Result<(), StorageError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.lock();
        self.append(&mut inner, Event::Leased { ids, epoch })
    }

    pub fn set_tag_velocity(&self, tag: String, velocity: f64) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        self.append(&mut inner, Event::TagVelocitySet { tag, velocity })
    }

    pub fn tag_velocity(&self, tag: &str) -> Option<f64> {
        self.inner.lock().state.tag_velocity.get(tag).copied()
    }

    /// Ordered, filtered candidate scan (spec §4.4 step 2):
    /// `scope ∈ scopes` AND (`pending` OR (`working` AND expired lease)),
    /// ordered by scope rank ascending, priority descending, epoch
    /// ascending. Does not lease; the scheduler does that after applying
    /// tag-rate throttling.
    pub fn select_candidates(&self, scopes: &[String], now_ms: i64, lease_ms: i64) -> Vec<StepRecord> {
        let inner = self.inner.lock();
        let mut candidates: Vec<(usize, StepRecord)> = inner
            .state
            .steps
            .values()
            .filter_map(|step| {
                let rank = scopes.iter().position(|s| s == &step.scope)?;
                let eligible = step.status == Status::Pending
                    || (step.status == Status::Working && now_ms - step.epoch > lease_ms);
                eligible.then(|| (rank, step.clone()))
            })
            .collect();

        candidates.sort_by(|(rank_a, a), (rank_b, b)| {
            rank_a
                .cmp(rank_b)
                .then(b.priority.cmp(&a.priority))
                .then(a.epoch.cmp(&b.epoch))
                .then(a.id.as_str().cmp(b.id.as_str()))
        });

        candidates.into_iter().map(|(_, step)| step).collect()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
