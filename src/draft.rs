//! The email request draft sent to the mailing service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An email request being assembled.
///
/// Fields hold raw JSON values because the mailing service accepts several
/// shapes per field (a single address or a list, a string or a number).
/// Shapes are checked by the [`Validator`](crate::Validator) at send time,
/// never when a field is set.
///
/// An absent field is `None`. JSON `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    /// Recipients: an address or a list of addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
    /// Carbon copy recipients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Value>,
    /// Blind carbon copy recipients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Value>,
    /// Reply-to address(es)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Value>,
    /// Template rendered by the mailing service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_code: Option<Value>,
    /// Subject line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    /// Raw message content, used when there is no template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Template variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Correlated entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    /// Correlated entity identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Value>,
    /// User on whose behalf the email is sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_created: Option<Value>,
}

impl EmailDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the draft is in body mode (no template code).
    pub fn is_body_mode(&self) -> bool {
        self.template_code.is_none()
    }

    /// The wire form of this draft: `to`, `cc` and `bcc` given as a single
    /// address become one-element lists. Everything else is left untouched.
    pub fn normalized(&self) -> Self {
        let mut draft = self.clone();
        draft.to = draft.to.map(into_list);
        draft.cc = draft.cc.map(into_list);
        draft.bcc = draft.bcc.map(into_list);
        draft
    }

    /// Serialize the draft into the JSON payload.
    pub fn to_payload(&self) -> Value {
        // A struct of Option<Value> fields always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Convert a setter argument into a field value; `null` clears the field.
pub(crate) fn field(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        value => Some(value),
    }
}

fn into_list(value: Value) -> Value {
    match value {
        Value::String(s) => Value::Array(vec![Value::String(s)]),
        other => other,
    }
}
