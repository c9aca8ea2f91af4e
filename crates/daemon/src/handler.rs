// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection handling: one TCP connection is one request/response (spec
//! §4.6). A handler-pool task dequeues a connection, reads exactly one
//! frame, dispatches it, writes a response if the method has one, and
//! the connection is then dropped by the caller.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use stepgraph_core::SystemClock;
use stepgraph_engine::{cancel, done, report_error, reset, select_ready, soft_retry, RateLimiter};
use stepgraph_storage::{BlobStore, StepRecordStore};
use stepgraph_wire::{encode_steps, parse_request, read_frame, write_frame, Request, UNKNOWN_METHOD_MESSAGE};

use crate::error::DaemonError;

/// Shared handles every connection handler needs. Cheap to clone (all
/// fields are `Arc`s or `Copy`); one instance is built at startup and
/// handed to every handler-pool task.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<StepRecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub limiter: Arc<RateLimiter>,
    pub clock: SystemClock,
    pub limit: usize,
    pub lease_ms: i64,
}

/// Handle one connection end to end: read its single frame, dispatch,
/// write the response (if any), done. Never returns an `Err` that the
/// caller needs to act on beyond logging — every failure path here is
/// already a terminal outcome for the connection (spec §7: "No
/// exception propagates to the accept loop; handlers catch and log.").
pub async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(mut stream: S, ctx: Context) {
    let frame = match read_frame(&mut stream).await {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(error = %e, "frame read failed, closing connection");
            return;
        }
    };

    let request = match parse_request(&frame) {
        Ok(request) => request,
        Err(stepgraph_wire::ProtocolError::UnknownMethod(method)) => {
            tracing::debug!(method, "unknown method");
            let _ = stream.write_all(UNKNOWN_METHOD_MESSAGE).await;
            return;
        }
        Err(e) => {
            tracing::debug!(error = %e, "malformed request, closing connection");
            return;
        }
    };

    if let Err(e) = dispatch(&mut stream, &ctx, request).await {
        tracing::warn!(error = %e, "request handling failed, closing connection");
    }
}

async fn dispatch<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut S,
    ctx: &Context,
    request: Request,
) -> Result<(), DaemonError> {
    match request {
        Request::GetSteps { scopes } => {
            let ids = retry_once(|| async {
                select_ready(&ctx.store, &ctx.limiter, &ctx.clock, &scopes, ctx.limit, ctx.lease_ms)
                    .map_err(DaemonError::from)
            })
            .await?;
            let body = encode_steps(&ids)?;
            write_frame(stream, &body).await?;
        }
        Request::Done { id } => {
            retry_once(|| async { done(&ctx.store, ctx.blobs.as_ref(), &ctx.clock, id).await.map_err(DaemonError::from) })
                .await?;
        }
        Request::Pending { id } => {
            retry_once(|| async { soft_retry(&ctx.store, &ctx.clock, id).map_err(DaemonError::from) }).await?;
        }
        Request::Cancel { id } => {
            retry_once(|| async {
                cancel(&ctx.store, ctx.blobs.as_ref(), &ctx.clock, id).await.map_err(DaemonError::from)
            })
            .await?;
        }
        Request::Reset { id } => {
            retry_once(|| async { reset(&ctx.store, &ctx.clock, id).map_err(DaemonError::from) }).await?;
        }
        Request::Error { id, msg, trace } => {
            retry_once(|| async {
                report_error(&ctx.store, &ctx.clock, id, Some(msg.clone()), Some(trace.clone()))
                    .map_err(DaemonError::from)
            })
            .await?;
        }
    }
    Ok(())
}

/// Run `op` once; if it fails with a retryable ([`DaemonError::is_retryable`])
/// error, run it once more and return that outcome (spec §7: "store-io
/// ... retried once inside the operation; otherwise surfaced").
async fn retry_once<T, F, Fut>(mut op: F) -> Result<T, DaemonError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DaemonError>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(e) if e.is_retryable() => op().await,
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
