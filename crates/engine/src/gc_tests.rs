// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stepgraph_core::{AdmittedStep, Status};
use stepgraph_storage::{step_data_key, BlobStore, MemoryBlobStore, StepRecordStore};
use tempfile::tempdir;

fn admitted(id: StepId, parents: Vec<StepId>, children: Vec<StepId>, status: Status) -> AdmittedStep {
    AdmittedStep {
        id,
        priority: 0,
        scope: "default".into(),
        velocity: None,
        tag: None,
        status,
        epoch: 0,
        parents,
        children,
    }
}

fn open_store() -> (tempfile::TempDir, StepRecordStore) {
    let dir = tempdir().expect("tempdir");
    let store = StepRecordStore::open(dir.path().join("test.wal")).expect("open");
    (dir, store)
}

#[tokio::test]
async fn collects_when_whole_component_is_terminal() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let (a, b) = (StepId::new(), StepId::new());
    store
        .admit_bundle(vec![
            admitted(a, vec![], vec![b], Status::Success),
            admitted(b, vec![a], vec![], Status::Cancel),
        ])
        .expect("admit");
    blobs.set(&step_data_key(a.as_str()), b"a".to_vec()).await.expect("seed a");
    blobs.set(&step_data_key(b.as_str()), b"b".to_vec()).await.expect("seed b");

    collect(&store, &blobs, a).await.expect("collect");

    assert_eq!(blobs.get(&step_data_key(a.as_str())).await.expect("get"), None);
    assert_eq!(blobs.get(&step_data_key(b.as_str())).await.expect("get"), None);
}

#[tokio::test]
async fn skips_when_a_member_is_not_yet_terminal() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let (a, b) = (StepId::new(), StepId::new());
    store
        .admit_bundle(vec![
            admitted(a, vec![], vec![b], Status::Success),
            admitted(b, vec![a], vec![], Status::Pending),
        ])
        .expect("admit");
    blobs.set(&step_data_key(a.as_str()), b"a".to_vec()).await.expect("seed a");

    collect(&store, &blobs, a).await.expect("collect");

    assert_eq!(blobs.get(&step_data_key(a.as_str())).await.expect("get").as_deref(), Some(&b"a"[..]));
}

#[tokio::test]
async fn errored_member_blocks_collection() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let (a, b) = (StepId::new(), StepId::new());
    store
        .admit_bundle(vec![
            admitted(a, vec![], vec![b], Status::Success),
            admitted(b, vec![a], vec![], Status::Error),
        ])
        .expect("admit");
    blobs.set(&step_data_key(a.as_str()), b"a".to_vec()).await.expect("seed a");

    collect(&store, &blobs, a).await.expect("collect");

    assert!(
        blobs.get(&step_data_key(a.as_str())).await.expect("get").is_some(),
        "an errored member keeps the whole component's payloads for inspection"
    );
}
