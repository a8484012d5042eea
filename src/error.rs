use std::fmt;

use thiserror::Error as ThisError;

use crate::policy::Policy;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Boxed failure raised by a handler or collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can surface while processing a request.
///
/// Only the boundary converts these into the external error contract.
/// `Validation`, `Violation` and `NotFound` are produced on purpose and keep
/// their payload; everything else is treated as an unhandled failure.
#[derive(Debug, ThisError)]
pub enum Error {
    /// One or more fields failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A policy denied the request
    #[error(transparent)]
    Violation(#[from] Violation),
    /// A resource referenced by the request does not exist
    #[error("not found: {message}")]
    NotFound {
        /// Caller-safe description of what was missing
        message: String,
    },
    /// No route was composed for this request type
    #[error("no handler registered for `{request}`")]
    MissingHandler {
        /// Name of the request type
        request: &'static str,
    },
    /// The persistence collaborator failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Any other failure raised by a handler
    #[error("internal failure: {0}")]
    Internal(#[source] BoxError),
}

impl Error {
    /// Creates a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Wraps an arbitrary failure as an internal error.
    pub fn internal(err: impl Into<BoxError>) -> Self {
        Error::Internal(err.into())
    }
}

/// A policy violation with details about what failed.
///
/// The message is for operators; callers only ever see the violation's kind
/// translated into a `Forbidden` envelope.
#[derive(Debug, ThisError)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The kind of policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Authentication is required but missing
    Unauthenticated,
    /// A named policy denied the caller
    Forbidden {
        /// The policy that denied the request
        policy: Policy,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::Forbidden { policy } => write!(f, "Forbidden by '{}'", policy),
        }
    }
}
