//! Tests for the users API error envelope.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn trace_id() -> String {
    "6f1c2a4e-9a43-4f55-8d1b-0c9f3e2a7b10".to_owned()
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = error.error_response();
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("body is readable");
    let body = serde_json::from_slice(&bytes).expect("body is an error envelope");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("invalid email address"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("user not found"), StatusCode::NOT_FOUND)]
#[case(
    Error::service_unavailable("user repository unavailable"),
    StatusCode::SERVICE_UNAVAILABLE
)]
#[case(Error::internal("query failed"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(err.status_code(), status);
}

#[rstest]
#[actix_web::test]
async fn validation_failures_keep_message_and_details(trace_id: String) {
    let error = Error::invalid_request("email address already registered")
        .with_trace_id(trace_id.clone())
        .with_details(json!({"field": "email", "code": "duplicate_email"}));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(trace_id.as_str()));
    assert_eq!(body.message(), "email address already registered");
    assert_eq!(
        body.details(),
        Some(&json!({"field": "email", "code": "duplicate_email"}))
    );
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted_but_traceable(trace_id: String) {
    let error = Error::internal("relation \"users\" does not exist")
        .with_trace_id(trace_id.clone())
        .with_details(json!({"table": "users"}));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(trace_id.as_str()));
    assert_eq!(body.code(), ErrorCode::InternalError);
    assert_eq!(body.message(), INTERNAL_MESSAGE);
    assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn untraced_errors_send_no_trace_header() {
    let (status, header, body) = render(&Error::not_found("user not found")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(header.is_none());
    assert_eq!(body.trace_id(), None);
}

#[rstest]
fn unavailable_store_message_reaches_the_client() {
    let error = Error::service_unavailable("user repository unavailable: refused");
    assert_eq!(
        client_view(&error).message(),
        "user repository unavailable: refused"
    );
}
