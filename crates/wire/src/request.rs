// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request parsing (spec §4.6): a frame's body is `METHOD|-**-|PAYLOAD`.

use serde::Deserialize;

use stepgraph_core::StepId;

use crate::error::ProtocolError;

pub const SEPARATOR: &[u8] = b"|-**-|";

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetSteps { scopes: Vec<String> },
    Done { id: StepId },
    Pending { id: StepId },
    Cancel { id: StepId },
    Reset { id: StepId },
    Error { id: StepId, msg: String, trace: String },
}

#[derive(Deserialize)]
struct ErrorPayload {
    step_id: String,
    msg: String,
    trace: String,
}

/// Parse a frame body into a [`Request`]. An unrecognized method name is
/// [`ProtocolError::UnknownMethod`], not `Malformed` — the two are
/// handled differently (spec §7): malformed frames close the connection
/// silently, unknown methods get the literal `Unknown method.` response.
pub fn parse_request(frame: &[u8]) -> Result<Request, ProtocolError> {
    let separator_at = find_separator(frame)
        .ok_or_else(|| ProtocolError::Malformed("missing method/payload separator".into()))?;
    let method = std::str::from_utf8(&frame[..separator_at])
        .map_err(|_| ProtocolError::Malformed("method is not valid UTF-8".into()))?;
    let payload = &frame[separator_at + SEPARATOR.len()..];

    match method {
        "get-steps" => {
            let scopes = serde_json::from_slice(payload)
                .map_err(|e| ProtocolError::Malformed(format!("get-steps payload: {e}")))?;
            Ok(Request::GetSteps { scopes })
        }
        "done" => Ok(Request::Done { id: step_id_payload(payload)? }),
        "pending" => Ok(Request::Pending { id: step_id_payload(payload)? }),
        "cancel" => Ok(Request::Cancel { id: step_id_payload(payload)? }),
        "reset" => Ok(Request::Reset { id: step_id_payload(payload)? }),
        "error" => {
            let parsed: ErrorPayload = serde_json::from_slice(payload)
                .map_err(|e| ProtocolError::Malformed(format!("error payload: {e}")))?;
            Ok(Request::Error {
                id: StepId::from_string(parsed.step_id),
                msg: parsed.msg,
                trace: parsed.trace,
            })
        }
        other => Err(ProtocolError::UnknownMethod(other.to_string())),
    }
}

fn step_id_payload(payload: &[u8]) -> Result<StepId, ProtocolError> {
    let s = std::str::from_utf8(payload)
        .map_err(|_| ProtocolError::Malformed("step id is not valid UTF-8".into()))?;
    Ok(StepId::from_string(s))
}

fn find_separator(frame: &[u8]) -> Option<usize> {
    frame.windows(SEPARATOR.len()).position(|w| w == SEPARATOR)
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
