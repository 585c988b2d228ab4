//! LoggerTransport tests.

use std::sync::Arc;

use janis_mail::transports::LoggerTransport;
use janis_mail::Mail;

#[tokio::test]
async fn logger_answers_with_an_id() {
    let response = Mail::new()
        .transport(Arc::new(LoggerTransport::new()))
        .client_code("acme")
        .template_code("welcome")
        .to("a@b.com")
        .send()
        .await
        .unwrap();

    assert!(!response.id.is_empty());
}

#[tokio::test]
async fn full_logger_answers_with_an_id() {
    let response = Mail::new()
        .transport(Arc::new(LoggerTransport::full()))
        .client_code("acme")
        .to(vec!["a@b.com", "b@b.com"])
        .subject("Hi")
        .body("Hello")
        .send()
        .await
        .unwrap();

    assert!(!response.id.is_empty());
}
