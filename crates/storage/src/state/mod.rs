// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built by folding [`Event`]s recovered from the WAL.
//!
//! The DAG state engine never touches [`StepRecord`]s directly: every
//! mutation is expressed as an `Event`, appended to the log, and then
//! applied here. Replaying the same events in the same order, whether at
//! startup or immediately after an in-process append, always yields the
//! same table.

use std::collections::HashMap;

use stepgraph_core::{AdmittedStep, Event, StepId, StepRecord};

/// In-memory step table plus the tag velocity caps operators have set.
#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    pub steps: HashMap<StepId, StepRecord>,
    /// Per-tag rate cap (steps/sec), set by `TagVelocitySet` or carried on
    /// a step's own `velocity` field at admission.
    pub tag_velocity: HashMap<String, f64>,
}

impl MaterializedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one recovered or freshly-appended event into the table.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::BundleAdmitted { steps } => self.apply_bundle_admitted(steps),
            Event::StatusChanged { id, status, epoch, msg, trace } => {
                if let Some(step) = self.steps.get_mut(id) {
                    step.status = *status;
                    step.epoch = *epoch;
                    step.msg.clone_from(msg);
                    step.trace.clone_from(trace);
                }
            }
            Event::BulkStatusChanged { ids, status, epoch } => {
                for id in ids {
                    if let Some(step) = self.steps.get_mut(id) {
                        step.status = *status;
                        step.epoch = *epoch;
                    }
                }
            }
            Event::Leased { ids, epoch } => {
                for id in ids {
                    if let Some(step) = self.steps.get_mut(id) {
                        step.status = stepgraph_core::Status::Working;
                        step.epoch = *epoch;
                    }
                }
            }
            Event::TagVelocitySet { tag, velocity } => {
                self.tag_velocity.insert(tag.clone(), *velocity);
            }
        }
    }

    fn apply_bundle_admitted(&mut self, steps: &[AdmittedStep]) {
        for admitted in steps {
            // Idempotent: a replayed BundleAdmitted never overwrites a step
            // whose status has since moved on.
            if self.steps.contains_key(&admitted.id) {
                continue;
            }
            if let Some(tag) = &admitted.tag {
                if let Some(velocity) = admitted.velocity {
                    self.tag_velocity.entry(tag.clone()).or_insert(velocity);
                }
            }
            self.steps.insert(
                admitted.id.clone(),
                StepRecord {
                    id: admitted.id.clone(),
                    priority: admitted.priority,
                    scope: admitted.scope.clone(),
                    velocity: admitted.velocity,
                    tag: admitted.tag.clone(),
                    status: admitted.status,
                    epoch: admitted.epoch,
                    msg: None,
                    trace: None,
                    parents: admitted.parents.clone(),
                    children: admitted.children.clone(),
                },
            );
        }
    }

    pub fn get(&self, id: &StepId) -> Option<&StepRecord> {
        self.steps.get(id)
    }

    pub fn status_of(&self, id: &StepId) -> Option<stepgraph_core::Status> {
        self.steps.get(id).map(|s| s.status)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
