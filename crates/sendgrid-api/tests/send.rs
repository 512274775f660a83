//! Integration tests for the provider client.
//!
//! These tests run against a local mock HTTP server, so no real account or
//! network access is needed.

#![allow(clippy::unwrap_used)]

use sendgrid_api::{Client, Credentials, Endpoint, Error};
use sendgrid_message::{Address, Attachment, Bodies, Message};
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, header_regex, method, path,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn addr(raw: &str) -> Address {
    Address::parse(raw).unwrap()
}

fn message() -> Message {
    Message::builder(addr("Sender <sender@example.com>"))
        .to(addr("Alice <alice@example.com>"))
        .to(addr("bob@example.com"))
        .cc(addr("carol@example.com"))
        .subject("Hello")
        .bodies(Bodies::new("<p>Hi</p>", "Hi"))
        .build()
        .unwrap()
}

fn client(server: &MockServer, credentials: Credentials) -> Client {
    Client::new(credentials, Endpoint::new(server.uri()).unwrap())
}

#[tokio::test]
async fn test_v3_send_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer SG.test"))
        .and(body_partial_json(json!({
            "personalizations": [{
                "to": [
                    {"email": "alice@example.com", "name": "Alice"},
                    {"email": "bob@example.com", "name": "bob@example.com"}
                ],
                "cc": [{"email": "carol@example.com", "name": "carol@example.com"}]
            }],
            "subject": "Hello",
            "content": [
                {"type": "text/plain", "value": "Hi"},
                {"type": "text/html", "value": "<p>Hi</p>"}
            ]
        })))
        .respond_with(ResponseTemplate::new(202).insert_header("x-message-id", "abc123"))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = client(&server, Credentials::api_key("SG.test"))
        .send(&message())
        .await
        .unwrap();

    assert_eq!(delivery.status, 202);
    assert!(delivery.is_success());
    assert!(
        delivery
            .headers
            .iter()
            .any(|(name, value)| name == "x-message-id" && value == "abc123")
    );
}

#[tokio::test]
async fn test_v3_provider_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"errors":[{"message":"authorization required"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, Credentials::api_key("SG.bad"))
        .send(&message())
        .await
        .unwrap_err();

    match err {
        Error::Provider { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("authorization required"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_legacy_send_form_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mail.send.json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("api_user=user"))
        .and(body_string_contains("to%5B%5D=alice%40example.com"))
        .and(body_string_contains("cc%5B%5D=carol%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = client(&server, Credentials::legacy("user", "secret"))
        .send(&message())
        .await
        .unwrap();

    assert_eq!(delivery.status, 200);
    assert_eq!(delivery.body, r#"{"message":"success"}"#);
}

#[tokio::test]
async fn test_legacy_send_multipart_with_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mail.send.json"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("files[report.pdf]"))
        .and(body_string_contains("%PDF-1.4"))
        .and(body_string_contains("alice@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::builder(addr("sender@example.com"))
        .to(addr("alice@example.com"))
        .subject("Report")
        .bodies(Bodies::new("", "Attached"))
        .attach(Attachment::new("report.pdf", b"%PDF-1.4"))
        .build()
        .unwrap();

    let delivery = client(&server, Credentials::legacy("user", "secret"))
        .send(&message)
        .await
        .unwrap();
    assert_eq!(delivery.body, r#"{"message":"success"}"#);
}

#[tokio::test]
async fn test_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = Endpoint::new(format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);

    let err = Client::new(Credentials::api_key("SG.test"), endpoint)
        .send(&message())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
