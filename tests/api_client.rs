#![allow(clippy::unwrap_used)]
//! Single-endpoint client behaviour against a mock HTTP server.
//!
//! Covers response normalization (`text` field vs raw body), status and
//! transport error classification, per-endpoint timeouts and cancellation.

use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clipling::api::{ApiClient, ResponseMode};
use clipling::cancel::{CancelSignal, cancel_pair};
use clipling::endpoint::Endpoint;
use clipling::error::ApiError;

fn endpoint(server: &MockServer, timeout_seconds: u64) -> Endpoint {
    Endpoint::new("mock", format!("{}/ask", server.uri()), timeout_seconds)
}

async fn call_with_body(body: ResponseTemplate, mode: ResponseMode) -> Result<String, ApiError> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(body)
        .mount(&server)
        .await;

    ApiClient::new()
        .call(&endpoint(&server, 5), "hello", mode, &CancelSignal::never())
        .await
}

#[tokio::test]
async fn sends_question_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"question": "How are you?"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = ApiClient::new()
        .call(
            &endpoint(&server, 5),
            "How are you?",
            ResponseMode::Text,
            &CancelSignal::never(),
        )
        .await;

    assert_eq!(outcome.unwrap(), "ok");
}

#[tokio::test]
async fn plain_body_is_payload() {
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_string("hello"),
        ResponseMode::Text,
    )
    .await;
    assert_eq!(outcome.unwrap(), "hello");
}

#[tokio::test]
async fn text_field_is_extracted() {
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hi"})),
        ResponseMode::Text,
    )
    .await;
    assert_eq!(outcome.unwrap(), "hi");
}

#[tokio::test]
async fn object_without_text_field_is_raw_body() {
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_string(r#"{"other":"x"}"#),
        ResponseMode::Text,
    )
    .await;
    assert_eq!(outcome.unwrap(), r#"{"other":"x"}"#);
}

#[tokio::test]
async fn array_body_is_raw_payload() {
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_string(r#"["hi"]"#),
        ResponseMode::Text,
    )
    .await;
    assert_eq!(outcome.unwrap(), r#"["hi"]"#);
}

#[tokio::test]
async fn malformed_json_is_still_success() {
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_string(r#"{"text": "unterminated"#),
        ResponseMode::Text,
    )
    .await;
    assert_eq!(outcome.unwrap(), r#"{"text": "unterminated"#);
}

#[tokio::test]
async fn full_body_mode_skips_extraction() {
    let body = r#"{"text":"hi","json":{"rules":[]}}"#;
    let outcome = call_with_body(
        ResponseTemplate::new(200).set_body_string(body),
        ResponseMode::FullBody,
    )
    .await;
    assert_eq!(outcome.unwrap(), body);
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let outcome = call_with_body(
        ResponseTemplate::new(500).set_body_string("boom"),
        ResponseMode::Text,
    )
    .await;

    let err = outcome.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let start = Instant::now();
    let outcome = ApiClient::new()
        .call(
            &endpoint(&server, 1),
            "hello",
            ResponseMode::Text,
            &CancelSignal::never(),
        )
        .await;

    assert!(matches!(
        outcome,
        Err(ApiError::Timeout {
            timeout_seconds: 1,
            ..
        })
    ));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let unreachable = Endpoint::new("down", "http://127.0.0.1:1/ask", 2);

    let outcome = ApiClient::new()
        .call(
            &unreachable,
            "hello",
            ResponseMode::Text,
            &CancelSignal::never(),
        )
        .await;

    let err = outcome.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn cancellation_aborts_in_flight_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let (handle, signal) = cancel_pair();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let start = Instant::now();
    let outcome = ApiClient::new()
        .call(&endpoint(&server, 30), "hello", ResponseMode::Text, &signal)
        .await;

    assert_eq!(outcome, Err(ApiError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn already_cancelled_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (handle, signal) = cancel_pair();
    handle.cancel();

    let outcome = ApiClient::new()
        .call(&endpoint(&server, 5), "hello", ResponseMode::Text, &signal)
        .await;

    assert_eq!(outcome, Err(ApiError::Cancelled));
}
