// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level scenario tests exercising the engine and storage
//! crates together, the way a worker driving the wire protocol would
//! see them behave. Each test stands for one of the reference
//! end-to-end scenarios: linear chain, diamond fan-out/fan-in, cancel
//! propagation, tag rate limiting, lease reclamation, and reset vs. a
//! plain queued step.

use std::collections::{HashMap, HashSet};

use stepgraph_core::{FakeClock, Language, StepDef, StepId, Status};
use stepgraph_engine::{admit, cancel, done, reset, select_ready, RateLimiter};
use stepgraph_storage::{MemoryBlobStore, StepRecordStore};
use tempfile::tempdir;

fn def(id: StepId, parents: Vec<StepId>) -> StepDef {
    StepDef {
        id,
        name: "step".into(),
        language: Language::Python,
        func: "run".into(),
        code: "".into(),
        kwargs: Default::default(),
        scope: "default".into(),
        tag: None,
        priority: 0,
        velocity: None,
        parents,
        children: vec![],
    }
}

fn tagged(id: StepId, tag: &str) -> StepDef {
    let mut d = def(id, vec![]);
    d.tag = Some(tag.to_string());
    d
}

fn link(steps: &mut HashMap<StepId, StepDef>, parent: StepId, child: StepId) {
    steps.get_mut(&child).expect("child present").parents.push(parent);
    steps.get_mut(&parent).expect("parent present").children.push(child);
}

fn open_store() -> (tempfile::TempDir, StepRecordStore) {
    let dir = tempdir().expect("tempdir");
    let store = StepRecordStore::open(dir.path().join("test.wal")).expect("open store");
    (dir, store)
}

/// Linear chain a -> b -> c: completing each step promotes exactly the
/// next one, never more, and the chain finishes with every step `success`.
#[tokio::test]
async fn linear_chain_promotes_one_hop_at_a_time() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();

    let (a, b, c) = (StepId::new(), StepId::new(), StepId::new());
    let mut steps = HashMap::new();
    steps.insert(a, def(a, vec![]));
    steps.insert(b, def(b, vec![]));
    steps.insert(c, def(c, vec![]));
    link(&mut steps, a, b);
    link(&mut steps, b, c);

    admit(&store, &blobs, &clock, steps, HashSet::from([a])).await.expect("admit");

    assert_eq!(store.get(&b).expect("get").status, Status::Queued);
    assert_eq!(store.get(&c).expect("get").status, Status::Queued);

    done(&store, &blobs, &clock, a).await.expect("done a");
    assert_eq!(store.get(&b).expect("get").status, Status::Pending);
    assert_eq!(store.get(&c).expect("get").status, Status::Queued, "c must not skip ahead of b");

    done(&store, &blobs, &clock, b).await.expect("done b");
    assert_eq!(store.get(&c).expect("get").status, Status::Pending);

    done(&store, &blobs, &clock, c).await.expect("done c");
    assert_eq!(store.get(&c).expect("get").status, Status::Success);
}

/// Diamond a -> {b, c} -> d: `d` only becomes pending once BOTH of its
/// parents have succeeded, regardless of completion order.
#[tokio::test]
async fn diamond_fan_in_waits_for_every_parent() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();

    let (a, b, c, d) = (StepId::new(), StepId::new(), StepId::new(), StepId::new());
    let mut steps = HashMap::new();
    for id in [a, b, c, d] {
        steps.insert(id, def(id, vec![]));
    }
    link(&mut steps, a, b);
    link(&mut steps, a, c);
    link(&mut steps, b, d);
    link(&mut steps, c, d);

    admit(&store, &blobs, &clock, steps, HashSet::from([a])).await.expect("admit");
    done(&store, &blobs, &clock, a).await.expect("done a");

    assert_eq!(store.get(&b).expect("get").status, Status::Pending);
    assert_eq!(store.get(&c).expect("get").status, Status::Pending);

    done(&store, &blobs, &clock, b).await.expect("done b");
    assert_eq!(store.get(&d).expect("get").status, Status::Queued, "d needs c too");

    done(&store, &blobs, &clock, c).await.expect("done c");
    assert_eq!(store.get(&d).expect("get").status, Status::Pending);
}

/// Cancelling any member of a connected component cancels the whole
/// component, in both directions, and is a no-op on unrelated steps.
#[tokio::test]
async fn cancel_propagates_through_the_whole_component() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();

    let (a, b, c, unrelated) = (StepId::new(), StepId::new(), StepId::new(), StepId::new());
    let mut steps = HashMap::new();
    steps.insert(a, def(a, vec![]));
    steps.insert(b, def(b, vec![]));
    steps.insert(c, def(c, vec![]));
    steps.insert(unrelated, def(unrelated, vec![]));
    link(&mut steps, a, b);
    link(&mut steps, b, c);

    admit(&store, &blobs, &clock, steps, HashSet::from([a, unrelated])).await.expect("admit");

    cancel(&store, &blobs, &clock, b).await.expect("cancel b");

    assert_eq!(store.get(&a).expect("get").status, Status::Cancel);
    assert_eq!(store.get(&b).expect("get").status, Status::Cancel);
    assert_eq!(store.get(&c).expect("get").status, Status::Cancel);
    assert_eq!(store.get(&unrelated).expect("get").status, Status::Pending, "cancel must not leak to unrelated steps");
}

/// A tag's velocity caps how many of its steps `select_ready` admits per
/// window: with velocity 1, only one of two same-tagged pending steps is
/// leased in a single call.
#[tokio::test]
async fn tag_velocity_throttles_same_tag_admission() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();
    let limiter = RateLimiter::new();

    let (a, b) = (StepId::new(), StepId::new());
    let mut steps = HashMap::new();
    steps.insert(a, tagged(a, "gpu"));
    steps.insert(b, tagged(b, "gpu"));
    admit(&store, &blobs, &clock, steps, HashSet::from([a, b])).await.expect("admit");
    store.set_tag_velocity("gpu".to_string(), 1.0).expect("set velocity");

    let scopes = vec!["default".to_string()];
    let leased = select_ready(&store, &limiter, &clock, &scopes, 10, stepgraph_engine::LEASE_MS).expect("select");

    assert_eq!(leased.len(), 1, "velocity 1 must cap admission at one gpu-tagged step");
    let other = if leased[0] == a { b } else { a };
    assert_eq!(store.get(&leased[0]).expect("get").status, Status::Working);
    assert_eq!(store.get(&other).expect("get").status, Status::Pending, "throttled sibling stays pending");
}

/// A step stuck in `working` past the lease horizon is reclaimed: a
/// later `select_ready` call re-leases it without anyone calling `done`
/// or `pending` first.
#[tokio::test]
async fn abandoned_lease_is_reclaimed_after_the_horizon() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();
    let limiter = RateLimiter::new();

    let a = StepId::new();
    let mut steps = HashMap::new();
    steps.insert(a, def(a, vec![]));
    admit(&store, &blobs, &clock, steps, HashSet::from([a])).await.expect("admit");

    let scopes = vec!["default".to_string()];
    let first = select_ready(&store, &limiter, &clock, &scopes, 10, stepgraph_engine::LEASE_MS).expect("select");
    assert_eq!(first, vec![a]);
    assert_eq!(store.get(&a).expect("get").status, Status::Working);

    // Not yet past the lease horizon: the step must not be re-leased.
    clock.advance_ms(stepgraph_engine::LEASE_MS / 2);
    let too_soon = select_ready(&store, &limiter, &clock, &scopes, 10, stepgraph_engine::LEASE_MS).expect("select");
    assert!(too_soon.is_empty(), "lease has not expired yet");

    clock.advance_ms(stepgraph_engine::LEASE_MS);
    let reclaimed = select_ready(&store, &limiter, &clock, &scopes, 10, stepgraph_engine::LEASE_MS).expect("select");
    assert_eq!(reclaimed, vec![a], "abandoned lease must be reclaimed");
}

/// Resetting a component sends starters back to `queued` (so ordinary
/// promotion has to re-admit them) but sends everything downstream to
/// `pending`, regardless of whether it had previously finished or not.
#[tokio::test]
async fn reset_sends_starters_to_queued_and_the_rest_to_pending() {
    let (_dir, store) = open_store();
    let blobs = MemoryBlobStore::new();
    let clock = FakeClock::new();

    let (a, b) = (StepId::new(), StepId::new());
    let mut steps = HashMap::new();
    steps.insert(a, def(a, vec![]));
    steps.insert(b, def(b, vec![]));
    link(&mut steps, a, b);

    admit(&store, &blobs, &clock, steps, HashSet::from([a])).await.expect("admit");
    done(&store, &blobs, &clock, a).await.expect("done a");
    done(&store, &blobs, &clock, b).await.expect("done b");
    assert_eq!(store.get(&b).expect("get").status, Status::Success);

    reset(&store, &clock, b).expect("reset");

    assert_eq!(store.get(&a).expect("get").status, Status::Queued, "starter resets to queued, not pending");
    assert_eq!(store.get(&b).expect("get").status, Status::Pending, "non-starter resets to pending");
}
