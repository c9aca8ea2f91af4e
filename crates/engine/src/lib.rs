// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepgraph-engine: the DAG state engine, blob GC, tag-rate limiter,
//! fair scheduler, and pipeline admitter — the business logic that sits
//! between the wire protocol and the step record store.

pub mod admitter;
pub mod dag;
pub mod error;
pub mod gc;
pub mod rate_limiter;
pub mod scheduler;

pub use admitter::admit;
pub use dag::{cancel, done, report_error, reset, soft_retry};
pub use error::EngineError;
pub use rate_limiter::RateLimiter;
pub use scheduler::{select_ready, DEFAULT_LIMIT, LEASE_MS};
