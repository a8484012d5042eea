//! Typed command/query dispatch.
//!
//! Request types are mapped to handlers in a composition root:
//!
//! ```text
//! Dispatcher::builder()
//!     .route(Route::new(handler).validator(rules))   // one route per request type
//!     .build()?                                       // duplicates are rejected here
//!   ↓
//! dispatch(&ctx, &request)
//!   ↓
//! TracingBehavior → ValidationBehavior → custom behaviors → handler
//! ```
//!
//! The mapping is fixed once `build()` returns; the dispatcher holds no
//! mutable state and can be shared across threads.

mod pipeline;
mod route;
mod trace;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use thiserror::Error as ThisError;

use crate::context::Ctx;
use crate::error::Error;
use crate::request::Request;

use self::pipeline::Pipeline;

pub use pipeline::{Behavior, Next};
pub use route::Route;
pub use trace::TracingBehavior;

/// Performs the effect of one request type.
///
/// Handlers are the only place where side effects happen. Closures of the
/// shape `Fn(&Ctx, &R) -> Result<R::Response, Error>` are handlers too.
pub trait Handler<R: Request>: Send + Sync {
    /// Handles the request.
    fn handle(&self, ctx: &Ctx, request: &R) -> Result<R::Response, Error>;
}

impl<R, F> Handler<R> for F
where
    R: Request,
    F: Fn(&Ctx, &R) -> Result<R::Response, Error> + Send + Sync,
{
    fn handle(&self, ctx: &Ctx, request: &R) -> Result<R::Response, Error> {
        self(ctx, request)
    }
}

/// Errors detected while composing a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CompositionError {
    /// A request type was registered more than once
    #[error("more than one handler registered for `{request}`")]
    DuplicateHandler {
        /// Name of the request type
        request: &'static str,
    },
}

type Routes = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Routes requests to their handlers through each route's behavior chain.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Ctx, Dispatcher, Error, Principal, Request, RequestMeta, Route};
///
/// #[derive(Debug)]
/// struct Greet {
///     name: String,
/// }
///
/// impl Request for Greet {
///     type Response = String;
/// }
///
/// let dispatcher = Dispatcher::builder()
///     .route(Route::<Greet>::new(|_: &Ctx, g: &Greet| -> Result<String, Error> {
///         Ok(format!("hello {}", g.name))
///     }))
///     .build()
///     .expect("one route per request type");
///
/// let ctx = Ctx::new(RequestMeta {
///     request_id: "req-1".to_string(),
///     principal: Some(Principal::new("u1")),
/// });
/// let reply = dispatcher.dispatch(&ctx, &Greet { name: "ada".to_string() }).unwrap();
/// assert_eq!(reply, "hello ada");
/// ```
pub struct Dispatcher {
    routes: Routes,
    names: Vec<&'static str>,
}

impl Dispatcher {
    /// Starts composing a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatches a request through its route.
    ///
    /// # Errors
    ///
    /// Returns whatever the route's behaviors or handler return, or
    /// `Error::MissingHandler` if no route exists for `R`.
    pub fn dispatch<R: Request>(&self, ctx: &Ctx, request: &R) -> Result<R::Response, Error> {
        let pipeline = self
            .routes
            .get(&TypeId::of::<R>())
            .and_then(|route| route.downcast_ref::<Pipeline<R>>())
            .ok_or(Error::MissingHandler { request: R::name() })?;

        pipeline.run(ctx, request)
    }

    /// Returns `true` if a route exists for `R`.
    pub fn handles<R: Request>(&self) -> bool {
        self.routes.contains_key(&TypeId::of::<R>())
    }

    /// Returns the number of composed routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes were composed.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.names)
            .finish()
    }
}

/// Builder collecting one route per request type.
#[derive(Default)]
pub struct DispatcherBuilder {
    routes: Routes,
    names: Vec<&'static str>,
    duplicates: Vec<&'static str>,
}

impl DispatcherBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the route for request type `R`.
    ///
    /// Registering the same request type twice is reported by `build()`.
    pub fn route<R: Request>(mut self, route: Route<R>) -> Self {
        let key = TypeId::of::<R>();
        if self.routes.contains_key(&key) {
            self.duplicates.push(R::name());
        } else {
            self.routes.insert(key, Box::new(route.into_pipeline()));
            self.names.push(R::name());
        }
        self
    }

    /// Finishes composition.
    ///
    /// # Errors
    ///
    /// Returns `CompositionError::DuplicateHandler` naming the first request
    /// type that was registered more than once.
    pub fn build(self) -> Result<Dispatcher, CompositionError> {
        if let Some(&request) = self.duplicates.first() {
            return Err(CompositionError::DuplicateHandler { request });
        }
        tracing::debug!(routes = ?self.names, "dispatcher composed");
        Ok(Dispatcher {
            routes: self.routes,
            names: self.names,
        })
    }
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("routes", &self.names)
            .field("duplicates", &self.duplicates)
            .finish()
    }
}
