// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator's TCP front end (spec §4.6, §5): one acceptor task,
//! a fixed-size handler pool draining a connection queue, and a
//! one-second tag-decrement ticker, all under one
//! [`tokio_util::sync::CancellationToken`]-governed lifecycle.

use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use stepgraph_core::SystemClock;
use stepgraph_engine::RateLimiter;
use stepgraph_storage::{BlobStore, StepRecordStore};

use crate::config::Config;
use crate::handler::{handle_connection, Context};

/// Bound on the acceptor->handler-pool queue. The spec's reference is
/// unbounded; we bound it so a sustained flood of connections applies
/// backpressure to `accept()` instead of growing memory without limit.
const QUEUE_DEPTH: usize = 1024;

pub struct Server {
    config: Config,
    store: Arc<StepRecordStore>,
    blobs: Arc<dyn BlobStore>,
    limiter: Arc<RateLimiter>,
}

impl Server {
    pub fn new(config: Config, store: Arc<StepRecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { config, store, blobs, limiter: Arc::new(RateLimiter::new()) }
    }

    /// Bind the listener and run until `shutdown` is cancelled. Returns
    /// once every in-flight handler has finished (the queue is drained,
    /// not discarded, on shutdown).
    pub async fn run(self, shutdown: CancellationToken) -> std::io::Result<()> {
        let listener = bind(&self.config.addr()).await?;
        tracing::info!(addr = %self.config.addr(), "listening");
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener. Split out from [`Self::run`]
    /// so tests can bind an ephemeral port (`127.0.0.1:0`) and read back
    /// the address the OS actually chose before handing the listener
    /// here.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> std::io::Result<()> {
        let (tx, rx) = mpsc::channel::<TcpStream>(QUEUE_DEPTH);
        let limiter = self.limiter.clone();
        let ctx = Context {
            store: self.store,
            blobs: self.blobs,
            limiter: self.limiter,
            clock: SystemClock,
            limit: self.config.limit,
            lease_ms: self.config.lease_ms,
        };

        let mut tasks = JoinSet::new();
        tasks.spawn(accept_loop(listener, tx, shutdown.clone()));
        tasks.spawn(handler_pool(rx, ctx, self.config.workers));
        tasks.spawn(tick_loop(limiter, shutdown.clone()));

        while tasks.join_next().await.is_some() {}
        Ok(())
    }
}

async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    let socket_addr: std::net::SocketAddr = addr.parse().map_err(std::io::Error::other)?;
    let socket = if socket_addr.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
    socket.bind(socket_addr)?;
    socket.listen(QUEUE_DEPTH as u32)
}

async fn accept_loop(listener: TcpListener, tx: mpsc::Sender<TcpStream>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::info!("accept loop shutting down");
                return;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _peer)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
                        }
                        if tx.send(stream).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "accept failed"),
                }
            }
        }
    }
}

async fn handler_pool(rx: mpsc::Receiver<TcpStream>, ctx: Context, workers: usize) {
    let rx = Arc::new(tokio::sync::Mutex::new(rx));
    let mut pool = JoinSet::new();
    for _ in 0..workers.max(1) {
        let rx = rx.clone();
        let ctx = ctx.clone();
        pool.spawn(async move {
            loop {
                let stream = { rx.lock().await.recv().await };
                match stream {
                    Some(stream) => handle_connection(stream, ctx.clone()).await,
                    None => return,
                }
            }
        });
    }
    while pool.join_next().await.is_some() {}
}

async fn tick_loop(limiter: Arc<RateLimiter>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            _ = interval.tick() => limiter.tick(),
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
