//! Logger transport that only logs calls.
//!
//! Useful for staging environments or when you want to see what would be sent
//! to the mailing service without sending it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{CallResponse, Headers, Transport};

/// Logger transport that emits tracing events for calls.
pub struct LoggerTransport {
    /// If true, log the full payload. If false, just log a summary.
    log_full: bool,
}

impl LoggerTransport {
    /// Create a logger transport with brief output.
    pub fn new() -> Self {
        Self { log_full: false }
    }

    /// Create a logger transport that logs whole payloads.
    pub fn full() -> Self {
        Self { log_full: true }
    }

    /// Set whether to log the full payload.
    pub fn log_full(mut self, full: bool) -> Self {
        self.log_full = full;
        self
    }
}

impl Default for LoggerTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LoggerTransport {
    async fn call(
        &self,
        service: &str,
        namespace: &str,
        method: &str,
        payload: &Value,
        headers: &Headers,
    ) -> Result<CallResponse, TransportError> {
        let id = uuid::Uuid::new_v4().to_string();

        if self.log_full {
            tracing::info!(
                id = %id,
                service,
                namespace,
                method,
                headers = ?headers,
                payload = %payload,
                "Mailing call logged (full)"
            );
        } else {
            tracing::info!(
                id = %id,
                service,
                namespace,
                method,
                to = ?payload.get("to"),
                template_code = ?payload.get("templateCode"),
                "Mailing call logged"
            );
        }

        Ok(CallResponse::new(serde_json::json!({ "id": id })))
    }

    fn name(&self) -> &'static str {
        "logger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_logger_brief() {
        let transport = LoggerTransport::new();

        let response = transport
            .call(
                "mailing",
                "email",
                "create",
                &json!({ "to": ["a@example.com"], "templateCode": "welcome" }),
                &Headers::new(),
            )
            .await
            .unwrap();

        assert!(response.id().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn test_logger_full() {
        let transport = LoggerTransport::full();

        let mut headers = Headers::new();
        headers.insert("janis-client".to_string(), "acme".to_string());

        let response = transport
            .call("mailing", "email", "create", &json!({ "body": "Hi" }), &headers)
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[test]
    fn test_logger_builder() {
        assert!(LoggerTransport::new().log_full(true).log_full);
        assert!(!LoggerTransport::new().log_full(false).log_full);
        assert!(!LoggerTransport::default().log_full);
    }

    #[test]
    fn test_name() {
        assert_eq!(LoggerTransport::new().name(), "logger");
    }
}
