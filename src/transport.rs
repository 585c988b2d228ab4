//! Transport trait and call response types.
//!
//! # Why `async_trait`?
//!
//! Transports are stored and passed around as `Arc<dyn Transport>`: the global
//! transport, the one chosen per [`Mail`](crate::Mail), and session-bound
//! wrappers produced by [`Session::bind`](crate::Session::bind). Native async
//! trait methods are not object safe, so the trait is declared with
//! `#[async_trait]`, which boxes the returned future.
//!
//! The boxing costs one allocation per call. Every call is a network round
//! trip, so that cost does not show up anywhere.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Headers sent alongside a call.
pub type Headers = HashMap<String, String>;

/// Response of a successful service call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// HTTP-like status code reported by the service
    pub status_code: u16,
    /// Decoded response body
    pub body: Value,
}

impl CallResponse {
    /// Create a `200` response with the given body.
    pub fn new(body: Value) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    /// Create a response with an explicit status.
    pub fn with_status(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The `id` of the created resource, if the body carries one.
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }
}

/// A client able to call an operation on a remote microservice.
///
/// Implement this trait to reach the mailing service through your own RPC
/// stack. The crate ships [`HttpTransport`](crate::transports::HttpTransport),
/// [`LocalTransport`](crate::transports::LocalTransport) and
/// [`LoggerTransport`](crate::transports::LoggerTransport).
///
/// # Example
///
/// ```ignore
/// use janis_mail::{CallResponse, Headers, Transport, TransportError};
///
/// struct MyRpc;
///
/// #[async_trait::async_trait]
/// impl Transport for MyRpc {
///     async fn call(
///         &self,
///         service: &str,
///         namespace: &str,
///         method: &str,
///         payload: &serde_json::Value,
///         headers: &Headers,
///     ) -> Result<CallResponse, TransportError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `method` on `namespace` of `service` with a JSON payload.
    ///
    /// Failing to reach the service, or any service-side failure, is
    /// reported as a [`TransportError`].
    async fn call(
        &self,
        service: &str,
        namespace: &str,
        method: &str,
        payload: &Value,
        headers: &Headers,
    ) -> Result<CallResponse, TransportError>;

    /// Transport name (for logging/debugging).
    fn name(&self) -> &'static str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_read_from_body() {
        let response = CallResponse::new(json!({ "id": "5de565c07de99000110dcdef" }));
        assert!(response.is_success());
        assert_eq!(response.id(), Some("5de565c07de99000110dcdef"));
    }

    #[test]
    fn non_string_id_is_missing() {
        let response = CallResponse::new(json!({ "id": 12 }));
        assert_eq!(response.id(), None);

        let response = CallResponse::new(json!({ "name": "MailError", "code": 3 }));
        assert_eq!(response.id(), None);
    }

    #[test]
    fn status_decides_success() {
        assert!(CallResponse::with_status(201, json!({})).is_success());
        assert!(!CallResponse::with_status(400, json!({})).is_success());
        assert!(!CallResponse::with_status(500, json!({})).is_success());
    }
}
