//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the pipeline. It
//! handles:
//! - Mapping inbound requests to domain types (`RequestMeta`) via `ExtractMetadata`
//! - Marking operations as policy-protected (`Endpoint`)
//! - Translating every failure into the external error contract (`ErrorEnvelope`)
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Nothing here depends on a specific web
//!    framework. A host converts its request into a `RequestAdapter` (or
//!    implements `ExtractMetadata` itself) and turns a `Reply` into its own
//!    response type.
//!
//! 2. **One Seam**: `Boundary::call` is the only place where internal
//!    failures become external responses. Nothing else writes responses.
//!
//! 3. **Authorization Before Dispatch**: Policies run before the dispatcher,
//!    so a denied request never reaches validators or handlers.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let adapter = RequestAdapter::from(http_req);
//! let reply = boundary.call(&update_endpoint, &adapter, update_request);
//! (reply.status(), Json(reply.to_json()?))
//! ```

mod adapter;
mod boundary;
mod endpoint;
mod envelope;
mod extract;
mod translator;

pub use adapter::RequestAdapter;
pub use boundary::Boundary;
pub use endpoint::Endpoint;
pub use envelope::{ErrorEnvelope, ErrorKind, Reply, FORBIDDEN_MESSAGE};
pub use extract::{ExtractMetadata, Identity};
pub use translator::ErrorTranslator;
