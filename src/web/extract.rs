//! Extraction boundary traits for web integration.
//!
//! This module defines how caller identity and request metadata are pulled
//! out of framework-specific request types.

use crate::request::{Principal, RequestMeta};

/// Supplies the authenticated caller for the current request.
///
/// The pipeline never creates or mutates principals; it only asks this
/// collaborator who is calling.
pub trait Identity {
    /// Returns the caller, or `None` for anonymous requests.
    fn current_principal(&self) -> Option<Principal>;
}

/// Extracts request metadata from a framework-specific request.
///
/// This trait ONLY maps framework types to domain types. It does not
/// authorize anything (that is the policy gate's job) and does not validate
/// payloads (that is the validation behavior's job).
///
/// # Examples
///
/// ```
/// use pipeline_core::web::{ExtractMetadata, Identity};
/// use pipeline_core::Principal;
///
/// // Example framework-specific implementation
/// struct MyFrameworkRequest {
///     request_id: String,
///     user: Option<String>,
/// }
///
/// impl Identity for MyFrameworkRequest {
///     fn current_principal(&self) -> Option<Principal> {
///         self.user.as_deref().map(Principal::new)
///     }
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn request_id(&self) -> String {
///         self.request_id.clone()
///     }
/// }
///
/// let req = MyFrameworkRequest { request_id: "req-1".to_string(), user: Some("u1".to_string()) };
/// let meta = req.extract_metadata();
/// assert_eq!(meta.request_id, "req-1");
/// assert_eq!(meta.principal.unwrap().id, "u1");
/// ```
pub trait ExtractMetadata: Identity {
    /// Returns the identifier used to correlate this request's log events.
    fn request_id(&self) -> String;

    /// Extracts request metadata for the pipeline.
    fn extract_metadata(&self) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id(),
            principal: self.current_principal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRequest {
        id: String,
        user: Option<String>,
    }

    impl Identity for TestRequest {
        fn current_principal(&self) -> Option<Principal> {
            self.user.as_ref().map(|u| Principal::new(u.clone()).with_role("member"))
        }
    }

    impl ExtractMetadata for TestRequest {
        fn request_id(&self) -> String {
            self.id.clone()
        }
    }

    #[test]
    fn extract_metadata_trait_works() {
        let req = TestRequest {
            id: "test-1".to_string(),
            user: Some("alice".to_string()),
        };

        let meta = req.extract_metadata();
        assert_eq!(meta.request_id, "test-1");
        assert!(meta.principal.unwrap().has_role("member"));
    }

    #[test]
    fn anonymous_request_has_no_principal() {
        let req = TestRequest {
            id: "test-2".to_string(),
            user: None,
        };

        assert!(req.current_principal().is_none());
        assert!(req.extract_metadata().principal.is_none());
    }
}
