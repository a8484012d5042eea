use crate::context::Ctx;
use crate::error::{Error, Violation, ViolationKind};
use crate::policy::{Decision, Policy};
use crate::store::{ResourceId, ResourceStore, StoreError};

/// The policy enforcement gate.
///
/// Evaluated at the boundary before a policy-protected request enters the
/// dispatcher, so a denied request never runs validators or touches handler
/// state.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Ctx, Policy, PolicyGate, Principal, RequestMeta};
/// use pipeline_core::{ResourceId, ResourceRef, ResourceStore, StoreError};
///
/// struct OneActivity;
///
/// impl ResourceStore for OneActivity {
///     fn find(&self, id: &ResourceId) -> Result<ResourceRef, StoreError> {
///         if id.as_str() == "7" {
///             Ok(ResourceRef::new(7u64, "u1"))
///         } else {
///             Err(StoreError::NotFound(id.clone()))
///         }
///     }
/// }
///
/// let ctx = Ctx::new(RequestMeta {
///     request_id: "req-123".to_string(),
///     principal: Some(Principal::new("u1")),
/// });
///
/// let gate = PolicyGate::new(&ctx).require(Policy::IsResourceHost, 7u64);
/// assert!(gate.check(&OneActivity).is_ok());
///
/// let gate = PolicyGate::new(&ctx).require(Policy::IsResourceHost, 8u64);
/// assert!(gate.check(&OneActivity).is_err());
/// ```
#[derive(Debug)]
pub struct PolicyGate<'a> {
    ctx: &'a Ctx,
    requirements: Vec<(Policy, ResourceId)>,
}

impl<'a> PolicyGate<'a> {
    /// Creates a gate for the given request context.
    pub fn new(ctx: &'a Ctx) -> Self {
        Self {
            ctx,
            requirements: Vec::new(),
        }
    }

    /// Adds a policy requirement on a resource, deduplicating identical requirements.
    pub fn require(mut self, policy: Policy, resource: impl Into<ResourceId>) -> Self {
        let req = (policy, resource.into());
        if !self.requirements.contains(&req) {
            self.requirements.push(req);
        }
        self
    }

    /// Validates every requirement, stopping at the first denial.
    ///
    /// A resource the store cannot find is a denial, reported exactly like a
    /// caller who does not satisfy the policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::Violation` when a requirement is denied, or
    /// `Error::Store` when the store itself failed.
    pub fn check(&self, store: &dyn ResourceStore) -> Result<(), Error> {
        let log = self.ctx.log();
        let Some(principal) = self.ctx.principal() else {
            if self.requirements.is_empty() {
                return Ok(());
            }
            log.warn(format_args!("anonymous caller refused by policy gate"));
            return Err(Violation::new(
                ViolationKind::Unauthenticated,
                "Cannot authorize unauthenticated principal",
            )
            .into());
        };

        for (policy, id) in &self.requirements {
            let resource = match store.find(id) {
                Ok(resource) => Some(resource),
                Err(StoreError::NotFound(_)) => None,
                Err(err) => return Err(err.into()),
            };

            if policy.evaluate(Some(principal), resource.as_ref()) == Decision::Deny {
                let reason = match resource {
                    Some(_) => "is not the host of",
                    None => "referenced missing resource",
                };
                let message = format!("{} {} '{}'", principal.id, reason, id);
                log.warn(format_args!("{} denied: {}", policy, message));
                return Err(Violation::new(ViolationKind::Forbidden { policy: *policy }, message).into());
            }
        }
        Ok(())
    }

    /// Returns `true` if the gate has no requirements.
    pub fn is_open(&self) -> bool {
        self.requirements.is_empty()
    }
}
