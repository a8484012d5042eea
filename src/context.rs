use crate::error::{Violation, ViolationKind};
use crate::logging::RequestLog;
use crate::request::{Principal, RequestMeta};

/// Per-request execution context.
///
/// Built once at the boundary from [`RequestMeta`] and handed read-only to
/// every behavior and to the handler. Nothing in the pipeline mutates it.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Ctx, Principal, RequestMeta};
///
/// let ctx = Ctx::new(RequestMeta {
///     request_id: "req-123".to_string(),
///     principal: Some(Principal::new("u1")),
/// });
///
/// assert_eq!(ctx.request_id(), "req-123");
/// assert_eq!(ctx.require_principal().unwrap().id, "u1");
/// ```
#[derive(Debug, Clone)]
pub struct Ctx {
    request_id: String,
    principal: Option<Principal>,
}

impl Ctx {
    /// Creates a context from extracted request metadata.
    pub fn new(meta: RequestMeta) -> Self {
        Self {
            request_id: meta.request_id,
            principal: meta.principal,
        }
    }

    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the principal if present.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns the principal, or a violation when the caller is anonymous.
    ///
    /// # Errors
    ///
    /// Returns `Violation` of kind `Unauthenticated` if no principal is present.
    pub fn require_principal(&self) -> Result<&Principal, Violation> {
        self.principal.as_ref().ok_or_else(|| {
            Violation::new(
                ViolationKind::Unauthenticated,
                "Authentication required: principal not provided",
            )
        })
    }

    /// Returns a logger that tags every event with this request's ID.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(principal: Option<Principal>) -> RequestMeta {
        RequestMeta {
            request_id: "req-ctx".to_string(),
            principal,
        }
    }

    #[test]
    fn anonymous_ctx_has_no_principal() {
        let ctx = Ctx::new(meta(None));

        assert_eq!(ctx.request_id(), "req-ctx");
        assert!(ctx.principal().is_none());
        let err = ctx.require_principal().unwrap_err();
        assert_eq!(err.kind, ViolationKind::Unauthenticated);
    }

    #[test]
    fn authenticated_ctx_exposes_principal() {
        let ctx = Ctx::new(meta(Some(Principal::new("u1"))));

        assert_eq!(ctx.principal().map(|p| p.id.as_str()), Some("u1"));
        assert!(ctx.require_principal().is_ok());
    }

    #[test]
    fn logger_carries_request_id() {
        let ctx = Ctx::new(meta(None));
        assert_eq!(ctx.log().request_id(), "req-ctx");
    }
}
