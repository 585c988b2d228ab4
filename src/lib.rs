//! # janis-mail
//!
//! Build, validate, and send email requests to the Janis mailing service.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! MAILING_BASE_URL=https://services.example.com
//! JANIS_SERVICE_NAME=my-service
//! JANIS_SERVICE_SECRET=xxxxx
//! ```
//!
//! Send emails from anywhere:
//! ```rust,ignore
//! use janis_mail::Mail;
//!
//! let response = Mail::new()
//!     .client_code("acme")
//!     .template_code("welcome")
//!     .to("user@example.com")
//!     .send()
//!     .await?;
//! ```
//!
//! The request is validated before anything is sent. Every failure, local or
//! remote, is a [`MailError`] whose [`code`](MailError::code) tells them apart.
//!
//! ## Sessions
//!
//! Attach a [`Session`] instead of a client code to send on behalf of a user.
//! The session user fills `userCreated` unless it is set explicitly, and the
//! transport is bound to the session before the call.
//!
//! ```rust,ignore
//! use janis_mail::{ApiSession, Mail};
//!
//! let session = Arc::new(ApiSession::new().with_user_id("U1").with_client_code("acme"));
//! Mail::new().session(session).template_code("welcome").send().await?;
//! ```
//!
//! ## Per-Call Transport Override
//!
//! ```rust,ignore
//! use janis_mail::transports::HttpTransport;
//!
//! let transport = Arc::new(HttpTransport::new("http://localhost:3000"));
//! Mail::new().transport(transport) /* ... */ .send().await?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `MAILING_TRANSPORT` | `http`, `local`, `logger`, `logger_full` |
//! | `MAILING_BASE_URL` | Base URL of the services (http transport) |
//! | `JANIS_SERVICE_NAME` | Name of the calling service (optional) |
//! | `JANIS_SERVICE_SECRET` | Secret of the calling service (optional) |
//!
//! ## Feature Flags
//!
//! - `http` (default) - HTTP transport via reqwest
//! - `local` - Assertion helpers in [`testing`]
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//!
//! ## Metrics
//!
//! Enable `features = ["metrics"]` to emit:
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `janis_mail_sends_total` | Counter | transport, status | Total sends |
//! | `janis_mail_send_duration_seconds` | Histogram | transport | Call duration |

/// The version of the janis-mail crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod draft;
mod error;
mod mail;
mod session;
mod transport;
mod validator;

pub mod transports;

#[cfg(feature = "local")]
pub mod testing;

use parking_lot::RwLock;
use std::env;
use std::sync::{Arc, OnceLock};

// Re-exports
pub use draft::EmailDraft;
pub use error::{ErrorCode, MailError, TransportError};
pub use mail::{Mail, MailResponse, MAILING_METHOD, MAILING_NAMESPACE, MAILING_SERVICE};
pub use session::{ApiSession, RequestContext, Session, SessionTransport, CLIENT_HEADER};
pub use transport::{CallResponse, Headers, Transport};
pub use validator::Validator;

// ============================================================================
// Global Transport Configuration
// ============================================================================

/// Global transport - swappable for testing
static TRANSPORT: RwLock<Option<Arc<dyn Transport>>> = RwLock::new(None);

/// Shared transport behind `MAILING_TRANSPORT=local`.
static LOCAL_TRANSPORT: OnceLock<transports::LocalTransport> = OnceLock::new();

/// Get the transport created for `MAILING_TRANSPORT=local`.
///
/// Returns `None` until the environment selected it. The handle shares its
/// recorded calls with the global transport, so they can be inspected or
/// flushed.
///
/// ```rust,ignore
/// if let Some(local) = janis_mail::local_transport() {
///     assert_eq!(local.call_count(), 1);
///     local.flush();
/// }
/// ```
pub fn local_transport() -> Option<transports::LocalTransport> {
    LOCAL_TRANSPORT.get().cloned()
}

/// Auto-detect the transport from available configuration.
fn detect_transport() -> Option<&'static str> {
    #[cfg(feature = "http")]
    if env::var("MAILING_BASE_URL").is_ok() {
        return Some("http");
    }
    None
}

/// Create transport from environment variables.
fn create_transport_from_env() -> Result<Arc<dyn Transport>, TransportError> {
    let kind = match env::var("MAILING_TRANSPORT") {
        Ok(kind) => kind.to_lowercase(),
        Err(_) => match detect_transport() {
            Some(kind) => {
                tracing::debug!(transport = kind, "Auto-detected mailing transport");
                kind.to_string()
            }
            None => {
                return Err(TransportError::NotConfigured(
                    "MAILING_TRANSPORT not set and could not auto-detect. \
                    Set MAILING_TRANSPORT or MAILING_BASE_URL."
                        .into(),
                ));
            }
        },
    };

    match kind.as_str() {
        #[cfg(feature = "http")]
        "http" => {
            let base_url = env::var("MAILING_BASE_URL").map_err(|_| {
                TransportError::NotConfigured("MAILING_BASE_URL not set".into())
            })?;
            let mut transport = transports::HttpTransport::new(base_url);
            if let (Ok(name), Ok(secret)) = (
                env::var("JANIS_SERVICE_NAME"),
                env::var("JANIS_SERVICE_SECRET"),
            ) {
                transport = transport.credentials(name, secret);
            }
            Ok(Arc::new(transport))
        }
        #[cfg(not(feature = "http"))]
        "http" => Err(TransportError::NotConfigured(
            "MAILING_TRANSPORT=http but 'http' feature is not enabled. \
            Add `features = [\"http\"]` to Cargo.toml"
                .into(),
        )),

        "local" => {
            // Shared so `local_transport()` sees the same calls after a reset
            let local = LOCAL_TRANSPORT.get_or_init(transports::LocalTransport::new);
            Ok(Arc::new(local.clone()))
        }
        "logger" => Ok(Arc::new(transports::LoggerTransport::new())),
        "logger_full" => Ok(Arc::new(transports::LoggerTransport::full())),

        _ => Err(TransportError::NotConfigured(format!(
            "Unknown MAILING_TRANSPORT: {}. Valid transports are: http, local, logger, logger_full",
            kind
        ))),
    }
}

/// Get or initialize the global transport.
pub(crate) fn get_transport() -> Result<Arc<dyn Transport>, TransportError> {
    // Fast path: already configured
    {
        let guard = TRANSPORT.read();
        if let Some(ref transport) = *guard {
            return Ok(Arc::clone(transport));
        }
    }

    // Slow path: need to configure
    let transport = create_transport_from_env()?;
    let mut guard = TRANSPORT.write();

    // Double-check after acquiring write lock
    Ok(Arc::clone(guard.get_or_insert(transport)))
}

/// Check if a transport can be created from the environment.
///
/// Logs a warning if `http` is requested but the feature flag is not enabled.
pub fn is_configured() -> bool {
    let kind = match env::var("MAILING_TRANSPORT") {
        Ok(kind) => kind,
        Err(_) => return detect_transport().is_some(),
    };
    match kind.to_lowercase().as_str() {
        #[cfg(feature = "http")]
        "http" => env::var("MAILING_BASE_URL").is_ok(),
        #[cfg(not(feature = "http"))]
        "http" => {
            tracing::warn!(
                "MAILING_TRANSPORT=http but 'http' feature is not enabled. \
                Add `features = [\"http\"]` to Cargo.toml"
            );
            false
        }
        "local" | "logger" | "logger_full" => true,
        _ => false,
    }
}

/// Initialize the global transport from environment variables.
///
/// Call this at startup to surface configuration problems early.
///
/// ```rust,ignore
/// // In main.rs
/// janis_mail::init()?;
/// ```
pub fn init() -> Result<(), TransportError> {
    if !is_configured() && TRANSPORT.read().is_none() {
        return Err(TransportError::NotConfigured(
            "no mailing transport configured".into(),
        ));
    }
    let _ = get_transport()?;
    Ok(())
}

// ============================================================================
// Manual Configuration (for testing or custom setups)
// ============================================================================

/// Manually configure the global transport.
///
/// Used by every [`Mail`] without its own transport. Later calls replace the
/// previous transport.
///
/// ```rust,ignore
/// use janis_mail::{configure, transports::LocalTransport};
///
/// configure(LocalTransport::new());
/// ```
pub fn configure<T: Transport + 'static>(transport: T) {
    let mut guard = TRANSPORT.write();
    *guard = Some(Arc::new(transport));
}

/// Configure with an Arc'd transport.
pub fn configure_arc(transport: Arc<dyn Transport>) {
    let mut guard = TRANSPORT.write();
    *guard = Some(transport);
}

/// Reset the global transport (useful for tests).
///
/// After calling this, the next send re-initializes from env vars.
pub fn reset() {
    let mut guard = TRANSPORT.write();
    *guard = None;
}

/// Get the configured transport (if initialized).
pub fn transport() -> Option<Arc<dyn Transport>> {
    let guard = TRANSPORT.read();
    guard.as_ref().cloned()
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::ApiSession;
    pub use crate::CallResponse;
    pub use crate::ErrorCode;
    pub use crate::Mail;
    pub use crate::MailError;
    pub use crate::MailResponse;
    pub use crate::Session;
    pub use crate::Transport;
    pub use crate::{configure, is_configured};
}
