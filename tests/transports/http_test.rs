//! HttpTransport tests against a mock mailing service.

use std::sync::Arc;

use janis_mail::transports::HttpTransport;
use janis_mail::{ApiSession, ErrorCode, Headers, Mail, Transport, TransportError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "5de565c07de99000110dcdef"
    }))
}

fn transport(server: &MockServer) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(server.uri()))
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn successful_send_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mailing/email/create"))
        .and(header("Content-Type", "application/json"))
        .and(header("janis-client", "acme"))
        .and(body_json(json!({
            "to": ["a@b.com"],
            "templateCode": "welcome",
            "data": { "name": "Ada" }
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let response = Mail::new()
        .transport(transport(&server))
        .client_code("acme")
        .template_code("welcome")
        .to("a@b.com")
        .data(json!({ "name": "Ada" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.id, "5de565c07de99000110dcdef");
}

#[tokio::test]
async fn service_credentials_are_sent() {
    let server = MockServer::start().await;
    let transport = HttpTransport::new(server.uri()).credentials("orders", "s3cret");

    Mock::given(method("POST"))
        .and(path("/mailing/email/create"))
        .and(header("janis-api-key", "service-orders"))
        .and(header("janis-api-secret", "s3cret"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let response = transport
        .call("mailing", "email", "create", &json!({}), &Headers::new())
        .await
        .unwrap();

    assert_eq!(response.id(), Some("5de565c07de99000110dcdef"));
}

#[tokio::test]
async fn session_client_code_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mailing/email/create"))
        .and(header("janis-client", "globex"))
        .and(body_json(json!({
            "templateCode": "welcome",
            "userCreated": "U1"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(
        ApiSession::new()
            .with_user_id("U1")
            .with_client_code("globex"),
    );
    let result = Mail::new()
        .transport(transport(&server))
        .session(session)
        .template_code("welcome")
        .send()
        .await;

    assert!(result.is_ok());
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn error_status_becomes_ms_call_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Template not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = Mail::new()
        .transport(transport(&server))
        .client_code("acme")
        .template_code("missing")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MsCallError);
    assert!(err.to_string().contains("Template not found"));
    match err.transport_error() {
        Some(TransportError::Status { status, message }) => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Template not found");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn error_status_without_body_uses_reason() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = HttpTransport::new(server.uri())
        .call("mailing", "email", "create", &json!({}), &Headers::new())
        .await
        .unwrap_err();

    match err {
        TransportError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn response_without_id_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = Mail::new()
        .transport(transport(&server))
        .client_code("acme")
        .template_code("welcome")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MsCallError);
    assert!(matches!(
        err.transport_error(),
        Some(TransportError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn unreachable_service_becomes_ms_call_error() {
    // Nothing listens on port 9 (discard)
    let err = Mail::new()
        .transport(Arc::new(HttpTransport::new("http://127.0.0.1:9")))
        .client_code("acme")
        .template_code("welcome")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MsCallError);
    assert!(matches!(err.transport_error(), Some(TransportError::Http(_))));
}

#[tokio::test]
async fn invalid_mail_never_reaches_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(success_response())
        .expect(0)
        .mount(&server)
        .await;

    let err = Mail::new()
        .transport(transport(&server))
        .client_code("acme")
        .to("a@b.com")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::RequiredFieldMissing);
}
