// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The blob store interface (spec §6.2): an opaque key -> bytes mapping.
//! Step definitions live under `step/{id}`, step payloads under
//! `step-data/{id}`. The coordinator never interprets the bytes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> std::io::Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>) -> std::io::Result<()>;
    async fn delete(&self, key: &str) -> std::io::Result<()>;
}

/// Filesystem-backed blob store: keys are mapped onto paths under `root`,
/// `/` in the key becomes a subdirectory separator.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> std::io::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, value).await
    }

    async fn delete(&self, key: &str) -> std::io::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory blob store, for tests and for embedding the coordinator in a
/// single process without a filesystem.
#[derive(Default)]
pub struct MemoryBlobStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> std::io::Result<()> {
        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> std::io::Result<()> {
        self.data.lock().remove(key);
        Ok(())
    }
}

pub fn step_def_key(id: &str) -> String {
    format!("step/{id}")
}

pub fn step_data_key(id: &str) -> String {
    format!("step-data/{id}")
}

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
