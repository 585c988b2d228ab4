//! The `Mail` request builder.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use crate::draft::{field, EmailDraft};
use crate::error::{MailError, TransportError};
use crate::session::{RequestContext, Session, CLIENT_HEADER};
use crate::transport::{CallResponse, Headers, Transport};
use crate::validator::Validator;

/// Service that owns email creation.
pub const MAILING_SERVICE: &str = "mailing";
/// Namespace of the email resource.
pub const MAILING_NAMESPACE: &str = "email";
/// Method creating an email.
pub const MAILING_METHOD: &str = "create";

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailResponse {
    /// Id of the email created by the mailing service
    pub id: String,
}

/// An outbound email request for the mailing service.
///
/// Fields are set with chained setters and checked only when the request is
/// sent, so the order of the setters does not matter. Setting a field again
/// replaces the previous value.
///
/// ```rust,ignore
/// use janis_mail::Mail;
/// use serde_json::json;
///
/// let response = Mail::new()
///     .client_code("acme")
///     .template_code("order-shipped")
///     .to("customer@example.com")
///     .data(json!({ "orderId": "A-100" }))
///     .entity("order")
///     .entity_id("A-100")
///     .send()
///     .await?;
///
/// println!("Created email {}", response.id);
/// ```
///
/// Without a template, a body, recipients and a subject are required:
///
/// ```rust,ignore
/// Mail::new()
///     .session(session)
///     .to(vec!["a@example.com", "b@example.com"])
///     .subject("Weekly report")
///     .body("<p>Numbers are up.</p>")
///     .send()
///     .await?;
/// ```
#[derive(Clone, Default)]
pub struct Mail {
    draft: EmailDraft,
    context: RequestContext,
    transport: Option<Arc<dyn Transport>>,
}

impl Mail {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recipients: an address or a list of addresses.
    pub fn to(mut self, to: impl Into<Value>) -> Self {
        self.draft.to = field(to.into());
        self
    }

    /// Set the CC recipients: an address or a list of addresses.
    pub fn cc(mut self, cc: impl Into<Value>) -> Self {
        self.draft.cc = field(cc.into());
        self
    }

    /// Set the BCC recipients: an address or a list of addresses.
    pub fn bcc(mut self, bcc: impl Into<Value>) -> Self {
        self.draft.bcc = field(bcc.into());
        self
    }

    /// Set the reply-to address(es).
    pub fn reply_to(mut self, reply_to: impl Into<Value>) -> Self {
        self.draft.reply_to = field(reply_to.into());
        self
    }

    /// Set the template the mailing service renders.
    ///
    /// With a template code, `to`, `subject` and `body` become optional.
    pub fn template_code(mut self, template_code: impl Into<Value>) -> Self {
        self.draft.template_code = field(template_code.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<Value>) -> Self {
        self.draft.subject = field(subject.into());
        self
    }

    /// Set the entity the email relates to.
    pub fn entity(mut self, entity: impl Into<Value>) -> Self {
        self.draft.entity = field(entity.into());
        self
    }

    /// Set the id of the entity the email relates to.
    pub fn entity_id(mut self, entity_id: impl Into<Value>) -> Self {
        self.draft.entity_id = field(entity_id.into());
        self
    }

    /// Set the template variables. Must be a JSON object.
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.draft.data = field(data.into());
        self
    }

    /// Set the raw message content, used when there is no template.
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.draft.body = field(body.into());
        self
    }

    /// Set the client the email is sent for.
    ///
    /// Sent as the `janis-client` header.
    pub fn client_code(mut self, client_code: impl Into<Value>) -> Self {
        self.context.client_code = field(client_code.into());
        self
    }

    /// Set the user on whose behalf the email is sent.
    ///
    /// Takes precedence over the session user.
    pub fn user_created(mut self, user_created: impl Into<Value>) -> Self {
        self.draft.user_created = field(user_created.into());
        self
    }

    /// Attach a caller session.
    pub fn session(mut self, session: Arc<dyn Session>) -> Self {
        self.context.session = Some(session);
        self
    }

    /// Send through `transport` instead of the global one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The draft as set so far.
    pub fn draft(&self) -> &EmailDraft {
        &self.draft
    }

    /// The identity context as set so far.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The draft with session defaults applied.
    fn prepared_draft(&self) -> EmailDraft {
        let mut draft = self.draft.clone();
        if draft.user_created.is_none() {
            if let Some(user_id) = self.context.session_user_id() {
                draft.user_created = Some(Value::String(user_id.to_string()));
            }
        }
        draft
    }

    /// Check the request without sending it.
    pub fn validate(&self) -> Result<(), MailError> {
        let draft = self.prepared_draft();
        Validator::new(&draft, &self.context).validate()
    }

    /// The payload `send` would hand to the transport.
    pub fn payload(&self) -> Result<Value, MailError> {
        let draft = self.prepared_draft();
        Validator::new(&draft, &self.context).validate()?;
        Ok(draft.normalized().to_payload())
    }

    /// Headers sent with the call.
    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(client_code) = self.context.client_code_str() {
            headers.insert(CLIENT_HEADER.to_string(), client_code.to_string());
        }
        headers
    }

    fn resolve_transport(&self) -> Result<Arc<dyn Transport>, TransportError> {
        let transport = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => crate::get_transport()?,
        };
        Ok(match &self.context.session {
            Some(session) => session.bind(transport),
            None => transport,
        })
    }

    /// Validate the request and create the email on the mailing service.
    ///
    /// Validation runs before any call is made. Each invocation validates and
    /// sends the current state again; nothing is cached between sends.
    pub async fn send(&self) -> Result<MailResponse, MailError> {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(code = %e.code(), error = %e, "Mail rejected");
                return Err(e);
            }
        };

        let transport = match self.resolve_transport() {
            Ok(transport) => transport,
            Err(e) => {
                tracing::error!(error = %e, "No mailing transport available");
                return Err(MailError::ms_call(e));
            }
        };
        let headers = self.headers();
        let recipients = payload
            .get("to")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len);

        let span = tracing::info_span!(
            "janis_mail.send",
            transport = transport.name(),
            template_code = ?self.draft.template_code,
            recipients,
        );

        async move {
            tracing::debug!("Sending mail");

            #[cfg(feature = "metrics")]
            let start = Instant::now();

            let result = transport
                .call(
                    MAILING_SERVICE,
                    MAILING_NAMESPACE,
                    MAILING_METHOD,
                    &payload,
                    &headers,
                )
                .await
                .and_then(into_mail_response)
                .map_err(MailError::ms_call);

            #[cfg(feature = "metrics")]
            {
                let duration = start.elapsed().as_secs_f64();
                let status = if result.is_ok() { "success" } else { "error" };
                metrics::counter!("janis_mail_sends_total", "transport" => transport.name(), "status" => status)
                    .increment(1);
                metrics::histogram!("janis_mail_send_duration_seconds", "transport" => transport.name())
                    .record(duration);
            }

            match &result {
                Ok(r) => tracing::info!(id = %r.id, "Mail created"),
                Err(e) => tracing::error!(error = %e, "Mail creation failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Read the created email id, treating error-shaped answers as failures.
fn into_mail_response(response: CallResponse) -> Result<MailResponse, TransportError> {
    if !response.is_success() {
        let message = response
            .body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(TransportError::Status {
            status: response.status_code,
            message,
        });
    }

    match response.id() {
        Some(id) => Ok(MailResponse { id: id.to_string() }),
        None => Err(TransportError::InvalidResponse(
            "response body has no id".into(),
        )),
    }
}

impl std::fmt::Debug for Mail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mail")
            .field("draft", &self.draft)
            .field("context", &self.context)
            .field("transport", &self.transport.as_ref().map(|t| t.name()))
            .finish()
    }
}
