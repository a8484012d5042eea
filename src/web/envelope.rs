//! The external error contract.

use std::fmt;

use http::StatusCode;
use serde::Serialize;

use crate::validation::FieldError;

/// Message sent with every `Forbidden` envelope.
///
/// Fixed so that a denial never reveals whether the resource exists.
pub const FORBIDDEN_MESSAGE: &str = "You are not allowed to perform this operation";

/// The error shape returned to callers.
///
/// Serializes as `{ "kind": ..., "errors": [...] }` for validation failures
/// and `{ "kind": ..., "message": ... }` for everything else. These four
/// kinds are the entire observable error surface.
///
/// # Examples
///
/// ```
/// use pipeline_core::web::ErrorEnvelope;
/// use pipeline_core::FieldError;
///
/// let envelope = ErrorEnvelope::ValidationFailed {
///     errors: vec![FieldError::new("title", "required")],
/// };
///
/// assert_eq!(envelope.status().as_u16(), 400);
/// assert_eq!(
///     envelope.to_json().unwrap(),
///     serde_json::json!({
///         "kind": "ValidationFailed",
///         "errors": [{ "field": "title", "message": "required" }]
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ErrorEnvelope {
    /// Caller input was malformed
    ValidationFailed {
        /// Every failing field
        errors: Vec<FieldError>,
    },
    /// A policy denied the caller
    Forbidden {
        /// Fixed denial message
        message: String,
    },
    /// A referenced resource does not exist
    NotFound {
        /// Caller-safe description
        message: String,
    },
    /// Anything else; details stay in the operator log
    Unhandled {
        /// Generic message
        message: String,
    },
}

impl ErrorEnvelope {
    /// Creates the standard `Forbidden` envelope.
    pub fn forbidden() -> Self {
        ErrorEnvelope::Forbidden {
            message: FORBIDDEN_MESSAGE.to_string(),
        }
    }

    /// Returns the envelope's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorEnvelope::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            ErrorEnvelope::Forbidden { .. } => ErrorKind::Forbidden,
            ErrorEnvelope::NotFound { .. } => ErrorKind::NotFound,
            ErrorEnvelope::Unhandled { .. } => ErrorKind::Unhandled,
        }
    }

    /// Returns the HTTP status paired with this envelope.
    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// Returns the envelope's message, if its kind carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorEnvelope::ValidationFailed { .. } => None,
            ErrorEnvelope::Forbidden { message }
            | ErrorEnvelope::NotFound { message }
            | ErrorEnvelope::Unhandled { message } => Some(message),
        }
    }

    /// Returns the field errors of a `ValidationFailed` envelope.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ErrorEnvelope::ValidationFailed { errors } => errors,
            _ => &[],
        }
    }

    /// Renders the envelope as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; envelopes hold only strings, so this
    /// does not happen in practice.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {}", self.kind(), message),
            None => write!(f, "{} ({} fields)", self.kind(), self.field_errors().len()),
        }
    }
}

/// The four externally visible error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request
    ValidationFailed,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    Unhandled,
}

impl ErrorKind {
    /// Returns the kind's wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "ValidationFailed",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unhandled => "Unhandled",
        }
    }

    /// Returns the fixed HTTP status for the kind.
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the boundary hands back to the host for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    status: StatusCode,
    body: Result<T, ErrorEnvelope>,
}

impl<T> Reply<T> {
    /// A successful reply (200 OK).
    pub fn ok(value: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Ok(value),
        }
    }

    /// A failed reply carrying the envelope's status.
    pub fn error(envelope: ErrorEnvelope) -> Self {
        Self {
            status: envelope.status(),
            body: Err(envelope),
        }
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` for a successful reply.
    pub fn is_success(&self) -> bool {
        self.body.is_ok()
    }

    /// Returns the body.
    pub fn body(&self) -> Result<&T, &ErrorEnvelope> {
        self.body.as_ref()
    }

    /// Returns the error envelope, if the reply failed.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        self.body.as_ref().err()
    }

    /// Consumes the reply, returning its body.
    pub fn into_result(self) -> Result<T, ErrorEnvelope> {
        self.body
    }
}

impl<T: Serialize> Reply<T> {
    /// Renders the body (payload or envelope) as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the success payload cannot be serialized.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match &self.body {
            Ok(value) => serde_json::to_value(value),
            Err(envelope) => envelope.to_json(),
        }
    }
}
