//! In-memory transport for development and testing.
//!
//! Records every call instead of reaching the mailing service, and answers
//! with a generated id.
//!
//! ```rust,ignore
//! use janis_mail::Mail;
//! use janis_mail::transports::LocalTransport;
//!
//! let local = LocalTransport::new();
//!
//! Mail::new()
//!     .transport(Arc::new(local.clone()))
//!     .client_code("acme")
//!     .template_code("welcome")
//!     .to("user@example.com")
//!     .send()
//!     .await?;
//!
//! assert_eq!(local.call_count(), 1);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{CallResponse, Headers, Transport};

/// A call captured by [`LocalTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Unique identifier for this call.
    pub id: String,
    pub service: String,
    pub namespace: String,
    pub method: String,
    /// Payload exactly as it was handed to the transport.
    pub payload: Value,
    pub headers: Headers,
    /// When the call was made.
    pub called_at: DateTime<Utc>,
}

impl RecordedCall {
    /// Look up a top-level payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Look up a header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    response: Option<CallResponse>,
    fail_with: Option<String>,
}

/// Transport that records calls in memory.
///
/// Clones share the same recorded calls and settings.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    state: Arc<RwLock<State>>,
}

impl LocalTransport {
    /// Create a local transport with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Response Simulation (for testing)
    // =========================================================================

    /// Answer every call with `response` instead of a generated id.
    pub fn set_response(&self, response: CallResponse) {
        self.state.write().response = Some(response);
    }

    /// Go back to answering with generated ids.
    pub fn clear_response(&self) {
        self.state.write().response = None;
    }

    /// Make every call fail with `message`.
    ///
    /// ```rust,ignore
    /// let local = LocalTransport::new();
    /// local.set_failure("connection refused");
    ///
    /// let err = mail.send().await.unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::MsCallError);
    /// ```
    pub fn set_failure(&self, message: impl Into<String>) {
        self.state.write().fail_with = Some(message.into());
    }

    /// Clear the failure state.
    pub fn clear_failure(&self) {
        self.state.write().fail_with = None;
    }

    // =========================================================================
    // Call Access (for testing assertions)
    // =========================================================================

    /// All recorded calls, oldest first.
    ///
    /// Calls that were made to fail are recorded too.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.read().calls.clone()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.read().calls.last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.state.read().calls.len()
    }

    pub fn has_calls(&self) -> bool {
        !self.state.read().calls.is_empty()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.state.write().calls.clear();
    }

    /// Remove and return all recorded calls.
    pub fn flush(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.state.write().calls)
    }

    /// Recorded calls whose payload matches `predicate`.
    pub fn find_calls<F>(&self, predicate: F) -> Vec<RecordedCall>
    where
        F: Fn(&Value) -> bool,
    {
        self.state
            .read()
            .calls
            .iter()
            .filter(|call| predicate(&call.payload))
            .cloned()
            .collect()
    }

    /// True if any call addressed `address` in its `to` field.
    pub fn sent_to(&self, address: &str) -> bool {
        self.state.read().calls.iter().any(|call| {
            match call.field("to") {
                Some(Value::String(to)) => to.eq_ignore_ascii_case(address),
                Some(Value::Array(list)) => list
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|to| to.eq_ignore_ascii_case(address)),
                _ => false,
            }
        })
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn call(
        &self,
        service: &str,
        namespace: &str,
        method: &str,
        payload: &Value,
        headers: &Headers,
    ) -> Result<CallResponse, TransportError> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut state = self.state.write();

        state.calls.push(RecordedCall {
            id: id.clone(),
            service: service.to_string(),
            namespace: namespace.to_string(),
            method: method.to_string(),
            payload: payload.clone(),
            headers: headers.clone(),
            called_at: Utc::now(),
        });

        if let Some(ref message) = state.fail_with {
            return Err(TransportError::custom(message.clone()));
        }

        Ok(match state.response {
            Some(ref response) => response.clone(),
            None => CallResponse::new(serde_json::json!({ "id": id })),
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
