//! Request-processing pipeline with validation, resource-host authorization
//! and a single error-translation seam.
//!
//! Every inbound request flows through the same stages:
//!
//! - **Policy gate**: endpoints marked with a policy (here `is-resource-host`)
//!   are checked before anything else runs. Missing resources and foreign
//!   resources are refused the same way.
//! - **Dispatcher**: routes a request, by its type, to exactly one handler
//!   through an explicit chain of behaviors.
//! - **Validation**: every validator registered for the request type runs and
//!   all failures are reported together; the handler is skipped on failure.
//! - **Error translation**: every failure, including panics, becomes one of
//!   four envelope kinds with a fixed HTTP status.
//!
//! # Core Types
//!
//! - [`Request`]: a command or query with a declared response type
//! - [`Dispatcher`]: the composed request-type → handler mapping
//! - [`Rules`] / [`Validator`]: per-request validation
//! - [`Policy`] / [`PolicyGate`]: resource-ownership authorization
//! - [`web::Boundary`]: the entry point that ties it all together
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use pipeline_core::web::{Boundary, Endpoint, ErrorKind, RequestAdapter};
//! use pipeline_core::{Ctx, Dispatcher, Error, Policy, Principal, Request, ResourceId, ResourceRef};
//! use pipeline_core::{ResourceStore, Route, Rule, Rules, StoreError};
//!
//! #[derive(Debug)]
//! struct Rename {
//!     id: u64,
//!     title: String,
//! }
//!
//! impl Request for Rename {
//!     type Response = String;
//! }
//!
//! struct Hosts;
//!
//! impl ResourceStore for Hosts {
//!     fn find(&self, id: &ResourceId) -> Result<ResourceRef, StoreError> {
//!         Ok(ResourceRef::new(id.clone(), "u1"))
//!     }
//! }
//!
//! let dispatcher = Dispatcher::builder()
//!     .route(
//!         Route::<Rename>::new(|_: &Ctx, r: &Rename| -> Result<String, Error> { Ok(r.title.clone()) })
//!             .validator(Rules::<Rename>::new().field("title", |r: &Rename| r.title.as_str(), [Rule::Required])),
//!     )
//!     .build()
//!     .expect("one route per request type");
//!
//! let boundary = Boundary::new(dispatcher, Arc::new(Hosts));
//! let endpoint = Endpoint::<Rename>::new("PUT /items/{id}")
//!     .protected_by(Policy::IsResourceHost, |r| r.id.into());
//!
//! let host = RequestAdapter::new("req-1").with_principal(Principal::new("u1"));
//! let stranger = RequestAdapter::new("req-2").with_principal(Principal::new("u2"));
//!
//! let reply = boundary.call(&endpoint, &host, Rename { id: 1, title: "Run".to_string() });
//! assert_eq!(reply.body().unwrap(), "Run");
//!
//! let reply = boundary.call(&endpoint, &stranger, Rename { id: 1, title: "Run".to_string() });
//! assert_eq!(reply.envelope().unwrap().kind(), ErrorKind::Forbidden);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod activities;
mod config;
mod context;
mod dispatch;
mod error;
mod gate;
mod logging;
mod policy;
mod request;
mod store;
mod validation;
pub mod web;

pub use config::BoundaryConfig;
pub use context::Ctx;
pub use dispatch::{
    Behavior, CompositionError, Dispatcher, DispatcherBuilder, Handler, Next, Route, TracingBehavior,
};
pub use error::{BoxError, Error, Violation, ViolationKind};
pub use gate::PolicyGate;
pub use logging::RequestLog;
pub use policy::{Decision, Policy, UnknownPolicy};
pub use request::{Principal, Request, RequestMeta};
pub use store::{ResourceId, ResourceRef, ResourceStore, StoreError};
pub use validation::{FieldError, Rule, Rules, ValidationBehavior, ValidationErrors, Validator, ValidatorSet};
