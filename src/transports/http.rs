//! HTTP transport for the mailing service.
//!
//! # Example
//!
//! ```rust,ignore
//! use janis_mail::transports::HttpTransport;
//!
//! let transport = HttpTransport::new("https://services.example.com")
//!     .credentials("my-service", "secret");
//! ```
//!
//! A call to `service`/`namespace`/`method` is a `POST` of the JSON payload to
//! `{base_url}/{service}/{namespace}/{method}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{CallResponse, Headers, Transport};

/// Header carrying the calling service's key.
pub const API_KEY_HEADER: &str = "janis-api-key";
/// Header carrying the calling service's secret.
pub const API_SECRET_HEADER: &str = "janis-api-secret";

/// Transport reaching services over HTTP with `reqwest`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Option<ServiceCredentials>,
}

struct ServiceCredentials {
    name: String,
    secret: String,
}

impl HttpTransport {
    /// Create a transport calling services under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create with a custom reqwest client.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials: None,
        }
    }

    /// Authenticate calls as the service `name`.
    pub fn credentials(mut self, name: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some(ServiceCredentials {
            name: name.into(),
            secret: secret.into(),
        });
        self
    }

    fn endpoint(&self, service: &str, namespace: &str, method: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            service,
            namespace,
            method
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        service: &str,
        namespace: &str,
        method: &str,
        payload: &Value,
        headers: &Headers,
    ) -> Result<CallResponse, TransportError> {
        let url = self.endpoint(service, namespace, method);
        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("User-Agent", format!("janis-mail/{}", crate::VERSION));

        if let Some(ref credentials) = self.credentials {
            req = req
                .header(API_KEY_HEADER, format!("service-{}", credentials.name))
                .header(API_SECRET_HEADER, &credentials.secret);
        }

        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }

        tracing::debug!(url = %url, "Calling service");

        let response = req.json(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            Ok(CallResponse::with_status(status.as_u16(), body))
        } else {
            let message = serde_json::from_str::<ServiceError>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            Err(TransportError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ============================================================================
// Service API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    message: Option<String>,
}
