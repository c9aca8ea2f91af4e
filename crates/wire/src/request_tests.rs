// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn frame(method: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = method.as_bytes().to_vec();
    buf.extend_from_slice(SEPARATOR);
    buf.extend_from_slice(payload);
    buf
}

#[test]
fn parses_get_steps() {
    let req = parse_request(&frame("get-steps", br#"["default","gpu"]"#)).expect("parse");
    assert_eq!(req, Request::GetSteps { scopes: vec!["default".into(), "gpu".into()] });
}

#[test]
fn parses_done_with_raw_step_id() {
    let req = parse_request(&frame("done", b"step-abc")).expect("parse");
    assert_eq!(req, Request::Done { id: StepId::from_string("step-abc") });
}

#[test]
fn parses_pending_cancel_reset() {
    assert_eq!(
        parse_request(&frame("pending", b"step-a")).expect("parse"),
        Request::Pending { id: StepId::from_string("step-a") }
    );
    assert_eq!(
        parse_request(&frame("cancel", b"step-b")).expect("parse"),
        Request::Cancel { id: StepId::from_string("step-b") }
    );
    assert_eq!(
        parse_request(&frame("reset", b"step-c")).expect("parse"),
        Request::Reset { id: StepId::from_string("step-c") }
    );
}

#[test]
fn parses_error_payload() {
    let payload = br#"{"step_id":"step-x","msg":"boom","trace":"at foo.py:1"}"#;
    let req = parse_request(&frame("error", payload)).expect("parse");
    assert_eq!(
        req,
        Request::Error {
            id: StepId::from_string("step-x"),
            msg: "boom".into(),
            trace: "at foo.py:1".into(),
        }
    );
}

#[test]
fn unknown_method_is_its_own_error_kind() {
    let err = parse_request(&frame("frobnicate", b"")).unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownMethod(m) if m == "frobnicate"));
}

#[test]
fn missing_separator_is_malformed() {
    let err = parse_request(b"done step-abc").unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed(_)));
}

#[test]
fn get_steps_with_bad_json_is_malformed() {
    let err = parse_request(&frame("get-steps", b"not json")).unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed(_)));
}
