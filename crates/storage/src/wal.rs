// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log of [`Event`]s.
//!
//! Entries are length-prefixed JSON records, appended with an `fsync` on
//! every flush. A crash mid-append leaves at most one torn trailing entry,
//! which [`Wal::open`] detects and discards — the step table it rebuilds
//! therefore only ever reflects whole, flushed transitions (spec §4.1).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use stepgraph_core::Event;

use crate::error::WalError;

/// One durable log entry: a monotonically increasing sequence number
/// paired with the event it recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

pub struct Wal {
    file: File,
    path: PathBuf,
    write_seq: u64,
}

impl Wal {
    /// Open (creating if absent) and replay the WAL at `path`.
    ///
    /// Returns the `Wal` positioned for further appends, plus every entry
    /// recovered in order, for the caller to fold into a fresh
    /// [`crate::state::MaterializedState`].
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, Vec<WalEntry>), WalError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;

        let entries = Self::replay(&mut file)?;
        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);

        Ok((Self { file, path, write_seq }, entries))
    }

    fn replay(file: &mut File) -> Result<Vec<WalEntry>, WalError> {
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let mut entries = Vec::new();
        let mut offset = 0usize;
        let mut seq = 0u64;
        while offset < bytes.len() {
            if offset + 4 > bytes.len() {
                tracing::warn!(offset, "truncating torn WAL length prefix");
                break;
            }
            let len = u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap_or_default()) as usize;
            let body_start = offset + 4;
            if body_start + len > bytes.len() {
                tracing::warn!(offset, "truncating torn WAL entry body");
                break;
            }
            let body = &bytes[body_start..body_start + len];
            match serde_json::from_slice::<Event>(body) {
                Ok(event) => {
                    seq += 1;
                    entries.push(WalEntry { seq, event });
                }
                Err(e) => {
                    return Err(WalError::Corrupt { offset: offset as u64, reason: e.to_string() });
                }
            }
            offset = body_start + len;
        }
        Ok(entries)
    }

    /// Append one event, returning its assigned sequence number. Does not
    /// fsync; call [`Wal::flush`] for durability before acting on the
    /// event.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        let body = serde_json::to_vec(event)?;
        let len = body.len() as u32;
        self.file.write_all(&len.to_be_bytes())?;
        self.file.write_all(&body)?;
        self.write_seq += 1;
        Ok(self.write_seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
