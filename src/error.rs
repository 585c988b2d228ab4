//! Error types for janis-mail.

use std::fmt;

use thiserror::Error;

/// Stable codes shared by every [`MailError`].
///
/// The numeric values are part of the public contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// A mandatory field (or identity source) is absent.
    RequiredFieldMissing = 1,
    /// A present field has a disallowed type.
    InvalidFieldType = 2,
    /// The mailing service call failed.
    MsCallError = 3,
}

impl ErrorCode {
    /// Numeric value of the code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Symbolic name of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            Self::InvalidFieldType => "INVALID_FIELD_TYPE",
            Self::MsCallError => "MS_CALL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Mail::send`](crate::Mail::send).
///
/// Local validation failures and remote failures share this one type and are
/// told apart by [`code`](MailError::code).
#[derive(Debug, Error)]
pub enum MailError {
    /// A required field, or the identity source, is missing.
    #[error("{0}")]
    RequiredFieldMissing(String),

    /// A field holds a value of the wrong type.
    #[error("{0}")]
    InvalidFieldType(String),

    /// The call to the mailing service failed. The transport failure is kept
    /// as the error source.
    #[error("{message}")]
    MsCall {
        message: String,
        #[source]
        source: TransportError,
    },
}

impl MailError {
    /// Create a required-field error.
    pub fn required(message: impl Into<String>) -> Self {
        Self::RequiredFieldMissing(message.into())
    }

    /// Create an invalid-type error.
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::InvalidFieldType(message.into())
    }

    /// Wrap a transport failure, reusing its message.
    pub fn ms_call(source: TransportError) -> Self {
        Self::MsCall {
            message: source.to_string(),
            source,
        }
    }

    /// The stable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RequiredFieldMissing(_) => ErrorCode::RequiredFieldMissing,
            Self::InvalidFieldType(_) => ErrorCode::InvalidFieldType,
            Self::MsCall { .. } => ErrorCode::MsCallError,
        }
    }

    /// The original transport failure, for `MsCall` errors.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::MsCall { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// No transport could be resolved for the call.
    #[error("Transport not configured: {0}")]
    NotConfigured(String),

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Mailing service error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The service answered, but not with the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Failure raised by a custom transport.
    #[error(transparent)]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap any error raised by a custom transport.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
