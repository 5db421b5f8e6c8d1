//! Tests for the error payload validation, serialisation and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("nope") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_message_under_error_key(expected_trace_id: String) {
    let error = Error::not_found("program not found")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "id": 4 }));

    let value = serde_json::to_value(&error).expect("serialises");
    assert_eq!(
        value,
        json!({
            "error": "program not found",
            "code": "not_found",
            "traceId": TRACE_ID,
            "details": { "id": 4 },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::conflict("email already registered"))
        .expect("serialises");
    assert_eq!(
        value,
        json!({ "error": "email already registered", "code": "conflict" })
    );
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace() {
    let ambient: TraceId = "11111111-1111-1111-1111-111111111111"
        .parse()
        .expect("valid UUID");
    let decoded = TraceId::scope(ambient, async {
        serde_json::from_value::<Error>(json!({ "error": "bad", "code": "invalid_request" }))
    })
    .await
    .expect("payload decodes");

    assert_eq!(decoded.code(), ErrorCode::InvalidRequest);
    assert!(decoded.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let result = serde_json::from_value::<Error>(json!({ "error": " ", "code": "forbidden" }));
    assert!(result.is_err());
}
