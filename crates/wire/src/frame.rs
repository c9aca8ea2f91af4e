// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame-level I/O (spec §6.1): a frame is payload bytes followed by the
//! literal 5-byte terminator `[-_-]`. There is no length prefix — the
//! terminator is a sentinel the reader scans for, exactly as the
//! reference implementation's `recvall` does.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProtocolError;

pub const TERMINATOR: &[u8] = b"[-_-]";

/// Read one frame: bytes up to (but not including) the terminator.
/// Returns [`ProtocolError::Malformed`] if the connection closes before a
/// terminator is seen.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    loop {
        let byte = reader.read_u8().await.map_err(|_| {
            ProtocolError::Malformed("connection closed before frame terminator".into())
        })?;
        buf.push(byte);
        if buf.len() >= TERMINATOR.len() && buf[buf.len() - TERMINATOR.len()..] == *TERMINATOR {
            buf.truncate(buf.len() - TERMINATOR.len());
            return Ok(buf);
        }
    }
}

/// Write one frame: `payload` followed by the terminator, then flush.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    writer.write_all(payload).await?;
    writer.write_all(TERMINATOR).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
