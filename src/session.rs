//! Session context and session-bound transports.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{CallResponse, Headers, Transport};

/// Header carrying the client (tenant) code.
pub const CLIENT_HEADER: &str = "janis-client";

/// Identity context supplied by the caller.
///
/// Only two things are read from a session: the acting user, used to fill
/// `userCreated`, and the transport binding. Sessions are never mutated.
pub trait Session: Send + Sync {
    /// Id of the user acting in this session.
    fn user_id(&self) -> Option<&str> {
        None
    }

    /// Client code this session acts for.
    fn client_code(&self) -> Option<&str> {
        None
    }

    /// Produce a transport that carries this session's identity.
    ///
    /// The default wraps `transport` in a [`SessionTransport`] that sends the
    /// session's client code as the `janis-client` header.
    fn bind(&self, transport: Arc<dyn Transport>) -> Arc<dyn Transport> {
        Arc::new(SessionTransport::new(
            transport,
            self.client_code().map(str::to_string),
        ))
    }
}

/// A plain session holding a user id and a client code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSession {
    pub user_id: Option<String>,
    pub client_code: Option<String>,
}

impl ApiSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acting user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the client code.
    pub fn with_client_code(mut self, client_code: impl Into<String>) -> Self {
        self.client_code = Some(client_code.into());
        self
    }
}

impl Session for ApiSession {
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn client_code(&self) -> Option<&str> {
        self.client_code.as_deref()
    }
}

/// Transport wrapper adding session identity headers to every call.
///
/// Headers supplied by the caller take precedence over the session's.
pub struct SessionTransport {
    inner: Arc<dyn Transport>,
    client_code: Option<String>,
}

impl SessionTransport {
    /// Wrap `inner`, sending `client_code` when the caller did not.
    pub fn new(inner: Arc<dyn Transport>, client_code: Option<String>) -> Self {
        Self { inner, client_code }
    }
}

#[async_trait]
impl Transport for SessionTransport {
    async fn call(
        &self,
        service: &str,
        namespace: &str,
        method: &str,
        payload: &Value,
        headers: &Headers,
    ) -> Result<CallResponse, TransportError> {
        match &self.client_code {
            Some(code) if !headers.contains_key(CLIENT_HEADER) => {
                let mut headers = headers.clone();
                headers.insert(CLIENT_HEADER.to_string(), code.clone());
                self.inner
                    .call(service, namespace, method, payload, &headers)
                    .await
            }
            _ => {
                self.inner
                    .call(service, namespace, method, payload, headers)
                    .await
            }
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Context the draft is validated and sent with.
#[derive(Clone, Default)]
pub struct RequestContext {
    /// Explicit client code
    pub client_code: Option<Value>,
    /// Caller session
    pub session: Option<Arc<dyn Session>>,
}

impl RequestContext {
    /// True when either a client code or a session is available.
    ///
    /// An empty client code does not count.
    pub fn has_identity(&self) -> bool {
        let client_code = match &self.client_code {
            Some(Value::String(code)) => !code.is_empty(),
            Some(_) => true,
            None => false,
        };
        client_code || self.session.is_some()
    }

    /// The client code when it is a non-empty string.
    pub fn client_code_str(&self) -> Option<&str> {
        self.client_code
            .as_ref()
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
    }

    /// Id of the session user, if any.
    pub fn session_user_id(&self) -> Option<&str> {
        self.session.as_deref().and_then(Session::user_id)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("client_code", &self.client_code)
            .field("session", &self.session.is_some())
            .finish()
    }
}
