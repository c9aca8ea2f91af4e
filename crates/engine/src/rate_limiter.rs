// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory tag-rate limiter (spec §3.3, §4.4, §5): `tag_usage` is a
//! single mutex-guarded map shared by the scheduler (which increments on
//! admission) and a background ticker (which decrements every tag by 1,
//! floored at 0, once a second). Velocity is advisory — a tag with no
//! recorded velocity is never throttled.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Tracks how many steps tagged `t` have been dispatched in the current
/// one-second window, for every tag seen so far.
#[derive(Default)]
pub struct RateLimiter {
    usage: Mutex<HashMap<String, u64>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and increments usage if `tag` is under its velocity
    /// cap (or has none). A step with no tag is never throttled.
    pub fn try_admit(&self, tag: Option<&str>, velocity: Option<f64>) -> bool {
        let Some(tag) = tag else { return true };
        let Some(velocity) = velocity else {
            // No recorded cap for this tag: admit unconditionally, but
            // still track usage so a later `TagVelocitySet` takes effect
            // immediately rather than after the next tick.
            *self.usage.lock().entry(tag.to_string()).or_insert(0) += 1;
            return true;
        };

        let mut usage = self.usage.lock();
        let count = usage.entry(tag.to_string()).or_insert(0);
        if (*count as f64) < velocity {
            *count += 1;
            true
        } else {
            false
        }
    }

    /// Decrement every known tag's usage by 1, floored at 0. Called once
    /// a second by the daemon's ticker task.
    pub fn tick(&self) {
        let mut usage = self.usage.lock();
        for count in usage.values_mut() {
            *count = count.saturating_sub(1);
        }
    }

    #[cfg(test)]
    pub(crate) fn usage_of(&self, tag: &str) -> u64 {
        self.usage.lock().get(tag).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "rate_limiter_tests.rs"]
mod tests;
