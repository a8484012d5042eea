//! Persistence collaborator used to resolve policy-protected resources.
//!
//! The pipeline needs exactly one thing from persistence: given a resource
//! id, who owns it. Handlers talk to their own stores directly; only the
//! policy gate goes through [`ResourceStore`].

use std::fmt;

use thiserror::Error;

use crate::error::BoxError;

/// Identifier of a domain object targeted by a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a resource id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A resource together with the identity that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// The resource's identifier
    pub id: ResourceId,
    /// Id of the principal that hosts the resource
    pub owner_id: String,
}

impl ResourceRef {
    /// Creates a resource reference.
    pub fn new(id: impl Into<ResourceId>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// Failures reported by a [`ResourceStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No resource exists with the given id
    #[error("resource '{0}' not found")]
    NotFound(ResourceId),
    /// The store could not be reached or failed mid-operation
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),
}

/// Looks up resources and their owners.
///
/// Implementations carry their own concurrency discipline; the pipeline
/// calls them from many requests at once.
pub trait ResourceStore: Send + Sync {
    /// Finds the resource with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the resource does not exist and
    /// `StoreError::Unavailable` when the lookup itself failed.
    fn find(&self, id: &ResourceId) -> Result<ResourceRef, StoreError>;
}
