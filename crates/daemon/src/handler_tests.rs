use std::collections::{HashMap, HashSet};

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use stepgraph_core::{Language, StepDef, StepId, SystemClock};
use stepgraph_engine::{admit, RateLimiter};
use stepgraph_storage::{MemoryBlobStore, StepRecordStore};
use stepgraph_wire::TERMINATOR;

use super::*;

fn test_def(id: &StepId, scope: &str, parents: Vec<StepId>) -> StepDef {
    StepDef {
        id: *id,
        name: "step".into(),
        language: Language::Python,
        func: "run".into(),
        code: String::new(),
        kwargs: HashMap::new(),
        scope: scope.into(),
        tag: None,
        priority: 0,
        velocity: None,
        parents,
        children: vec![],
    }
}

async fn test_ctx(dir: &tempfile::TempDir) -> Context {
    let store = Arc::new(StepRecordStore::open(dir.path().join("steps.wal")).expect("open store"));
    let blobs: Arc<dyn stepgraph_storage::BlobStore> = Arc::new(MemoryBlobStore::new());
    Context {
        store,
        blobs,
        limiter: Arc::new(RateLimiter::new()),
        clock: SystemClock,
        limit: 50,
        lease_ms: stepgraph_engine::LEASE_MS,
    }
}

async fn roundtrip(ctx: &Context, body: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(4096);
    let ctx = ctx.clone();
    let handle = tokio::spawn(async move { handle_connection(server, ctx).await });

    client.write_all(body).await.expect("write request");
    client.write_all(TERMINATOR).await.expect("write terminator");

    handle.await.expect("handler task panicked");

    let mut out = Vec::new();
    let _ = client.read_to_end(&mut out).await;
    out
}

#[tokio::test]
async fn get_steps_leases_a_pending_starter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir).await;

    let a = StepId::new();
    let defs = HashMap::from([(a, test_def(&a, "default", vec![]))]);
    admit(&ctx.store, ctx.blobs.as_ref(), &ctx.clock, defs, HashSet::from([a])).await.expect("admit");

    let body = b"get-steps|-**-|[\"default\"]";
    let response = roundtrip(&ctx, body).await;

    let ids: Vec<String> = serde_json::from_slice(&response).expect("valid json response");
    assert_eq!(ids, vec![a.to_string()]);
    assert_eq!(ctx.store.get(&a).expect("get").status, stepgraph_core::Status::Working);
}

#[tokio::test]
async fn done_has_no_response_body() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir).await;

    let a = StepId::new();
    let defs = HashMap::from([(a, test_def(&a, "default", vec![]))]);
    admit(&ctx.store, ctx.blobs.as_ref(), &ctx.clock, defs, HashSet::from([a])).await.expect("admit");

    let body = format!("done|-**-|{a}");
    let response = roundtrip(&ctx, body.as_bytes()).await;

    assert!(response.is_empty());
    assert_eq!(ctx.store.get(&a).expect("get").status, stepgraph_core::Status::Success);
}

#[tokio::test]
async fn unknown_method_gets_literal_message_without_terminator() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir).await;

    let response = roundtrip(&ctx, b"bogus|-**-|whatever").await;
    assert_eq!(response, stepgraph_wire::UNKNOWN_METHOD_MESSAGE);
}

#[tokio::test]
async fn malformed_frame_closes_with_no_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir).await;

    let response = roundtrip(&ctx, b"no separator here").await;
    assert!(response.is_empty());
}
