//! Tests for the error payload formatting and trace propagation.

use super::*;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("admins only"), ErrorCode::Forbidden)]
#[case(Error::conflict("login taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_messages_are_rejected(#[case] message: &str) {
    let err = Error::try_new(ErrorCode::InternalError, message).expect_err("blank message");
    assert_eq!(err, ErrorValidationError::EmptyMessage);
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::forbidden("Access denied")).expect("serialise");
    assert_eq!(value, json!({"code": "forbidden", "message": "Access denied"}));
}

#[rstest]
fn round_trips_trace_id_and_details() {
    let error = Error::invalid_request("bad amount")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "amount"}));

    let encoded = serde_json::to_string(&error).expect("serialise");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise");

    assert_eq!(decoded, error);
    assert_eq!(decoded.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let result = serde_json::from_value::<Error>(json!({"code": "not_found", "message": " "}));
    assert!(result.is_err());
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn trace_id_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}
