//! Request adapter for mapping HTTP requests to pipeline types.

use crate::request::Principal;

use super::{ExtractMetadata, Identity};

/// Adapter for converting framework-specific HTTP requests into pipeline types.
///
/// `RequestAdapter` is the primary integration point between web frameworks
/// and the boundary. It holds simple, owned data so it does not couple to any
/// specific framework's request types; framework code should implement
/// `From<FrameworkRequest>` for `RequestAdapter`, typically after session or
/// token middleware has resolved the caller.
///
/// # Examples
///
/// ```
/// use pipeline_core::web::{ExtractMetadata, RequestAdapter};
/// use pipeline_core::Principal;
///
/// let adapter = RequestAdapter::new("req-12345").with_principal(Principal::new("u1"));
///
/// let meta = adapter.extract_metadata();
/// assert_eq!(meta.request_id, "req-12345");
/// assert_eq!(meta.principal.unwrap().id, "u1");
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    principal: Option<Principal>,
}

impl RequestAdapter {
    /// Creates an anonymous request adapter with the given request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
        }
    }

    /// Sets the authenticated principal, returning the adapter.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Sets or clears the authenticated principal for this request.
    pub fn set_principal(&mut self, principal: Option<Principal>) {
        self.principal = principal;
    }

    /// Returns a reference to the principal, if present.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

impl Identity for RequestAdapter {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}

impl ExtractMetadata for RequestAdapter {
    fn request_id(&self) -> String {
        self.request_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_adapter_new() {
        let adapter = RequestAdapter::new("req-test");
        assert_eq!(adapter.request_id(), "req-test");
        assert!(adapter.principal().is_none());
    }

    #[test]
    fn request_adapter_set_principal() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_principal(Some(Principal::new("user-1")));
        assert_eq!(adapter.principal().unwrap().id, "user-1");

        adapter.set_principal(None);
        assert!(adapter.current_principal().is_none());
    }

    #[test]
    fn extract_metadata_includes_principal() {
        let adapter = RequestAdapter::new("req-1").with_principal(Principal::new("user-1"));

        let meta = adapter.extract_metadata();
        assert_eq!(meta.request_id, "req-1");
        assert_eq!(meta.principal.unwrap().id, "user-1");
    }

    #[test]
    fn multiple_extractions_produce_independent_copies() {
        let adapter = RequestAdapter::new("req-1").with_principal(Principal::new("user-1"));

        let first = adapter.extract_metadata();
        let second = adapter.extract_metadata();
        assert_eq!(first.principal, second.principal);
    }
}
