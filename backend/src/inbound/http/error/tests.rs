//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("ledger row vanished")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"account": 7}))
}

#[rstest]
#[case(Error::invalid_request("bad amount"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::SEE_OTHER)]
#[case(Error::forbidden("Access Denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn payload_of(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );

    let payload = payload_of(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("amount must be a number")
        .with_details(json!({"field": "amount", "code": "not_a_number"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = payload_of(response).await;
    assert_eq!(payload.message(), "amount must be a number");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "amount", "code": "not_a_number"}))
    );
}

#[rstest]
fn unauthorised_errors_redirect_to_login() {
    let response = ResponseError::error_response(&Error::unauthorized("login required"));

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(LOGIN_PATH)
    );
}

#[rstest]
#[actix_web::test]
async fn forbidden_errors_render_json_refusals() {
    let response = ResponseError::error_response(&Error::forbidden("Access Denied"));
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let payload = payload_of(response).await;
    assert_eq!(payload.code(), ErrorCode::Forbidden);
    assert_eq!(payload.message(), "Access Denied");
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
