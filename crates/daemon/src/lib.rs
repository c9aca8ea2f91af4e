// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stepgraph-daemon: the coordinator process. Wires the storage and
//! engine crates to a TCP front end speaking the wire protocol
//! (spec §4.6), reads its configuration from the environment (spec
//! §6.5), and installs structured logging.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod handler;
pub mod server;

pub use config::Config;
pub use error::DaemonError;
pub use server::Server;

/// Install the `tracing-subscriber` global subscriber, honoring
/// `RUST_LOG` via `EnvFilter` and defaulting to `info`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
