//! Request validation.
//!
//! This module provides:
//! - `FieldError` / `ValidationErrors`: the aggregated result of validating a request
//! - `Validator`: a pure check over one request type
//! - `ValidatorSet`: every validator registered for a request type
//! - `Rules`: a declarative, per-field rule builder
//! - `ValidationBehavior`: the pipeline stage that rejects invalid requests
//!
//! Validators never have side effects and never stop at the first failure;
//! the behavior only decides once every validator has run.

mod behavior;
mod rules;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

pub use behavior::ValidationBehavior;
pub use rules::{Rule, Rules};

/// A single failed rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Caller-facing description of the failure
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The complete result of validating a request.
///
/// Empty means valid. A value is only ever produced after every validator
/// for the request has run.
///
/// # Examples
///
/// ```
/// use pipeline_core::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// assert!(errors.is_empty());
///
/// errors.push("title", "required");
/// errors.push("city", "required");
/// assert_eq!(errors.fields().collect::<Vec<_>>(), ["title", "city"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Creates an empty (valid) result.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a failure.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Returns `true` if no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the recorded failures.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Iterates over the names of failing fields, in the order recorded.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    /// Consumes the result, returning the failures.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A pure check over one request type.
///
/// Implementations must report every failure they find and must not have
/// side effects. Closures of the shape `Fn(&R) -> ValidationErrors` are
/// validators too.
pub trait Validator<R>: Send + Sync {
    /// Validates the request, returning every failure found.
    fn validate(&self, request: &R) -> ValidationErrors;
}

impl<R, F> Validator<R> for F
where
    F: Fn(&R) -> ValidationErrors + Send + Sync,
{
    fn validate(&self, request: &R) -> ValidationErrors {
        self(request)
    }
}

/// Every validator registered for a request type.
///
/// An empty set accepts every request.
pub struct ValidatorSet<R> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R> ValidatorSet<R> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Adds a validator to the set.
    pub fn push(&mut self, validator: impl Validator<R> + 'static) {
        self.validators.push(Arc::new(validator));
    }

    /// Returns the number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if no validators are registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator and aggregates their failures.
    pub fn validate(&self, request: &R) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            errors.extend(validator.validate(request));
        }
        errors
    }
}

impl<R> Default for ValidatorSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ValidatorSet<R> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
        }
    }
}

impl<R> fmt::Debug for ValidatorSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSet")
            .field("validators", &self.validators.len())
            .finish()
    }
}
