// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepgraph-storage: the write-ahead log, blob store, materialized step
//! table, and the [`StepRecordStore`] that ties them together.

pub mod blob;
pub mod error;
pub mod state;
pub mod store;
pub mod wal;

pub use blob::{step_data_key, step_def_key, BlobStore, FsBlobStore, MemoryBlobStore};
pub use error::{StorageError, WalError};
pub use state::MaterializedState;
pub use store::StepRecordStore;
pub use wal::{Wal, WalEntry};
