//! Required-field and field-type checks for an [`EmailDraft`].
//!
//! Both passes stop at the first violated rule. Rule order only decides which
//! error surfaces when several rules are broken at once.

use serde_json::Value;

use crate::draft::EmailDraft;
use crate::error::MailError;
use crate::session::RequestContext;

/// Allowed shapes for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    String,
    StringOrNumber,
    StringOrList,
    Object,
}

impl Shape {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::StringOrNumber => value.is_string() || value.is_number(),
            Self::StringOrList => value.is_string() || value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::StringOrNumber => "a string or number",
            Self::StringOrList => "a string or array",
            Self::Object => "an object",
        }
    }
}

/// Validates a draft together with its request context.
#[derive(Debug)]
pub struct Validator<'a> {
    draft: &'a EmailDraft,
    context: &'a RequestContext,
}

impl<'a> Validator<'a> {
    pub fn new(draft: &'a EmailDraft, context: &'a RequestContext) -> Self {
        Self { draft, context }
    }

    /// Check that every mandatory field is present.
    ///
    /// Without a template code the draft is in body mode and needs `body`,
    /// `to` and `subject`. An identity source (client code or session) is
    /// always required.
    pub fn validate_required_fields(&self) -> Result<(), MailError> {
        let draft = self.draft;

        if draft.is_body_mode() {
            if draft.body.is_none() {
                return Err(MailError::required("templateCode or body is required"));
            }
            if draft.to.is_none() {
                return Err(MailError::required(
                    "to is required when templateCode is not set",
                ));
            }
            if draft.subject.is_none() {
                return Err(MailError::required(
                    "subject is required when templateCode is not set",
                ));
            }
        }

        if !self.context.has_identity() {
            return Err(MailError::required("clientCode or session is required"));
        }

        Ok(())
    }

    /// Check the type of every present field.
    pub fn validate_field_types(&self) -> Result<(), MailError> {
        let draft = self.draft;

        check("templateCode", draft.template_code.as_ref(), Shape::StringOrNumber)?;
        check("clientCode", self.context.client_code.as_ref(), Shape::String)?;
        if draft.is_body_mode() {
            check("to", draft.to.as_ref(), Shape::StringOrList)?;
        }
        check("data", draft.data.as_ref(), Shape::Object)?;
        check("subject", draft.subject.as_ref(), Shape::StringOrNumber)?;
        check("cc", draft.cc.as_ref(), Shape::StringOrList)?;
        check("bcc", draft.bcc.as_ref(), Shape::StringOrList)?;
        check("replyTo", draft.reply_to.as_ref(), Shape::StringOrList)?;
        check("entity", draft.entity.as_ref(), Shape::StringOrNumber)?;
        check("entityId", draft.entity_id.as_ref(), Shape::StringOrNumber)?;
        check("body", draft.body.as_ref(), Shape::String)?;
        check("userCreated", draft.user_created.as_ref(), Shape::String)?;

        Ok(())
    }

    /// Run both passes, required fields first.
    pub fn validate(&self) -> Result<(), MailError> {
        self.validate_required_fields()?;
        self.validate_field_types()
    }
}

fn check(name: &str, value: Option<&Value>, shape: Shape) -> Result<(), MailError> {
    match value {
        Some(value) if !shape.accepts(value) => Err(MailError::invalid_type(format!(
            "Invalid mail: {} property must be {}",
            name,
            shape.describe()
        ))),
        _ => Ok(()),
    }
}
