use std::collections::BTreeSet;
use std::fmt;

/// Metadata about an incoming request.
///
/// Contains the request identifier and optional principal (authenticated user).
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Authenticated principal, if any
    pub principal: Option<Principal>,
}

/// An authenticated caller.
///
/// Supplied by the identity collaborator for each request. The pipeline
/// reads it but never creates or mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable identifier for this principal
    pub id: String,
    /// Roles granted to the principal
    pub roles: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal with no roles.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Adds a role, returning the updated principal.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Returns `true` if the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A typed description of one operation.
///
/// Commands mutate state, queries read it. Each request type is paired with
/// exactly one handler when the dispatcher is composed.
///
/// # Examples
///
/// ```
/// use pipeline_core::Request;
///
/// #[derive(Debug)]
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = &'static str;
/// }
///
/// assert!(Ping::name().ends_with("Ping"));
/// ```
pub trait Request: fmt::Debug + Send + Sync + 'static {
    /// The value produced by the handler on success.
    type Response: Send + 'static;

    /// Name used in logs and composition errors.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
