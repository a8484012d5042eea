use std::fmt;

use crate::context::Ctx;
use crate::gate::PolicyGate;
use crate::policy::{Policy, UnknownPolicy};
use crate::request::Request;
use crate::store::ResourceId;

/// One external operation (conventionally one HTTP route) for request type `R`.
///
/// An endpoint may be marked with a policy; the boundary then evaluates it
/// against the resource the request targets before dispatching.
///
/// # Examples
///
/// ```
/// use pipeline_core::web::Endpoint;
/// use pipeline_core::{Policy, Request};
///
/// #[derive(Debug)]
/// struct DeleteActivity {
///     id: u64,
/// }
///
/// impl Request for DeleteActivity {
///     type Response = ();
/// }
///
/// let endpoint = Endpoint::<DeleteActivity>::new("DELETE /activities/{id}")
///     .protected_by_name("is-resource-host", |r| r.id.into())
///     .expect("known policy");
///
/// assert_eq!(endpoint.policy(), Some(Policy::IsResourceHost));
/// ```
pub struct Endpoint<R> {
    name: &'static str,
    protection: Option<Protection<R>>,
}

struct Protection<R> {
    policy: Policy,
    resource: fn(&R) -> ResourceId,
}

impl<R: Request> Endpoint<R> {
    /// Creates an unprotected endpoint.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            protection: None,
        }
    }

    /// Protects the endpoint with `policy` on the resource selected from the request.
    pub fn protected_by(mut self, policy: Policy, resource: fn(&R) -> ResourceId) -> Self {
        self.protection = Some(Protection { policy, resource });
        self
    }

    /// Protects the endpoint with a policy given by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPolicy` if no policy has that name.
    pub fn protected_by_name(self, policy: &str, resource: fn(&R) -> ResourceId) -> Result<Self, UnknownPolicy> {
        Ok(self.protected_by(policy.parse()?, resource))
    }

    /// Returns the endpoint's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the policy protecting this endpoint, if any.
    pub fn policy(&self) -> Option<Policy> {
        self.protection.as_ref().map(|p| p.policy)
    }

    pub(crate) fn gate<'a>(&self, ctx: &'a Ctx, request: &R) -> PolicyGate<'a> {
        let gate = PolicyGate::new(ctx);
        match &self.protection {
            Some(protection) => gate.require(protection.policy, (protection.resource)(request)),
            None => gate,
        }
    }
}

impl<R> fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("policy", &self.protection.as_ref().map(|p| p.policy))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestMeta;

    #[derive(Debug)]
    struct Touch {
        id: u64,
    }

    impl Request for Touch {
        type Response = ();
    }

    fn ctx() -> Ctx {
        Ctx::new(RequestMeta {
            request_id: "req-endpoint".to_string(),
            principal: None,
        })
    }

    #[test]
    fn unprotected_endpoint_has_open_gate() {
        let endpoint = Endpoint::<Touch>::new("POST /touch");
        let ctx = ctx();

        assert_eq!(endpoint.policy(), None);
        assert!(endpoint.gate(&ctx, &Touch { id: 1 }).is_open());
    }

    #[test]
    fn protected_endpoint_requires_policy() {
        let endpoint =
            Endpoint::<Touch>::new("POST /touch/{id}").protected_by(Policy::IsResourceHost, |t| t.id.into());
        let ctx = ctx();

        assert_eq!(endpoint.name(), "POST /touch/{id}");
        assert_eq!(endpoint.policy(), Some(Policy::IsResourceHost));
        assert!(!endpoint.gate(&ctx, &Touch { id: 3 }).is_open());
    }

    #[test]
    fn unknown_policy_name_is_rejected() {
        let result = Endpoint::<Touch>::new("POST /touch/{id}").protected_by_name("is-owner", |t| t.id.into());

        assert_eq!(result.unwrap_err(), UnknownPolicy("is-owner".to_string()));
    }

    #[test]
    fn debug_shows_policy() {
        let endpoint =
            Endpoint::<Touch>::new("POST /touch/{id}").protected_by(Policy::IsResourceHost, |t| t.id.into());
        let output = format!("{:?}", endpoint);

        assert!(output.contains("IsResourceHost"));
    }
}
