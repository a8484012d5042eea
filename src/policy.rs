use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::request::Principal;
use crate::store::ResourceRef;

/// A named authorization rule evaluated against a caller and a resource.
///
/// Each policy maps to a pure `(principal, resource) -> bool` rule. Policies
/// are attached to endpoints and evaluated before the request is dispatched.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Decision, Policy, Principal, ResourceRef};
///
/// let policy: Policy = "is-resource-host".parse().unwrap();
/// let resource = ResourceRef::new(7u64, "u1");
///
/// assert_eq!(policy.evaluate(Some(&Principal::new("u1")), Some(&resource)), Decision::Allow);
/// assert_eq!(policy.evaluate(Some(&Principal::new("u2")), Some(&resource)), Decision::Deny);
/// assert_eq!(policy.evaluate(Some(&Principal::new("u1")), None), Decision::Deny);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// The caller must own (host) the target resource
    IsResourceHost,
}

impl Policy {
    /// Every known policy.
    pub const ALL: [Policy; 1] = [Policy::IsResourceHost];

    /// Returns the policy's external name.
    pub const fn name(self) -> &'static str {
        match self {
            Policy::IsResourceHost => "is-resource-host",
        }
    }

    fn rule(self) -> fn(&Principal, &ResourceRef) -> bool {
        match self {
            Policy::IsResourceHost => is_resource_host,
        }
    }

    /// Evaluates the policy.
    ///
    /// Fails closed: a missing principal or a missing resource is a `Deny`,
    /// and the two are not distinguished from a failed rule.
    pub fn evaluate(self, principal: Option<&Principal>, resource: Option<&ResourceRef>) -> Decision {
        match (principal, resource) {
            (Some(principal), Some(resource)) if (self.rule())(principal, resource) => {
                Decision::Allow
            }
            _ => Decision::Deny,
        }
    }
}

fn is_resource_host(principal: &Principal, resource: &ResourceRef) -> bool {
    resource.owner_id == principal.id
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Returned when a policy name does not match any known policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown policy '{0}'")]
pub struct UnknownPolicy(pub String);

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The caller may proceed
    Allow,
    /// The caller is refused
    Deny,
}

impl Decision {
    /// Returns `true` for `Allow`.
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}
