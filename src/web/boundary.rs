//! The single entry point wrapping every inbound request.
//!
//! ```text
//! caller (ExtractMetadata)
//!   ↓
//! Ctx built from RequestMeta
//!   ↓
//! PolicyGate (only if the endpoint is protected)
//!   ↓
//! Dispatcher → TracingBehavior → ValidationBehavior → handler
//!   ↓
//! ErrorTranslator (every failure, including panics)
//!   ↓
//! Reply { status, body }
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::BoundaryConfig;
use crate::context::Ctx;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::request::Request;
use crate::store::ResourceStore;

use super::{Endpoint, ErrorTranslator, ExtractMetadata, Reply};

/// Hosts the pipeline: gate, dispatcher and error translation for each call.
///
/// Failures are turned into envelopes here and nowhere else.
pub struct Boundary {
    dispatcher: Dispatcher,
    store: Arc<dyn ResourceStore>,
    translator: ErrorTranslator,
}

impl Boundary {
    /// Creates a boundary with default settings.
    pub fn new(dispatcher: Dispatcher, store: Arc<dyn ResourceStore>) -> Self {
        Self {
            dispatcher,
            store,
            translator: ErrorTranslator::default(),
        }
    }

    /// Replaces the boundary's settings.
    pub fn with_config(mut self, config: BoundaryConfig) -> Self {
        self.translator = ErrorTranslator::new(config);
        self
    }

    /// Returns the composed dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serves one request on `endpoint` for `caller`.
    ///
    /// Never fails: every outcome, including a panicking handler, is a
    /// `Reply`. The process panic hook still runs before the panic is
    /// caught, and the default hook writes to stderr. Hosts that want panic
    /// output in their logs should install a hook that forwards to
    /// `tracing`:
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use pipeline_core::activities::{Activity, ActivityDetails, ActivityStore};
    /// use pipeline_core::web::{Boundary, Endpoint, ErrorKind, RequestAdapter};
    /// use pipeline_core::{Ctx, Dispatcher, Error, Route};
    ///
    /// std::panic::set_hook(Box::new(|info| {
    ///     tracing::error!(panic = %info, "handler panicked");
    /// }));
    ///
    /// let dispatcher = Dispatcher::builder()
    ///     .route(Route::<ActivityDetails>::new(
    ///         |_: &Ctx, r: &ActivityDetails| -> Result<Activity, Error> { panic!("no row {}", r.id) },
    ///     ))
    ///     .build()
    ///     .expect("one route");
    /// let boundary = Boundary::new(dispatcher, Arc::new(ActivityStore::new()));
    ///
    /// let reply = boundary.call(
    ///     &Endpoint::new("GET /activities/{id}"),
    ///     &RequestAdapter::new("req-1"),
    ///     ActivityDetails { id: 7 },
    /// );
    ///
    /// assert_eq!(reply.envelope().map(|e| e.kind()), Some(ErrorKind::Unhandled));
    /// ```
    pub fn call<R, C>(&self, endpoint: &Endpoint<R>, caller: &C, request: R) -> Reply<R::Response>
    where
        R: Request,
        C: ExtractMetadata + ?Sized,
    {
        let ctx = Ctx::new(caller.extract_metadata());
        ctx.log().debug(format_args!("{} called", endpoint.name()));

        // The panic hook has already run by the time the payload lands here.
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self.process(endpoint, &ctx, &request))) {
            Ok(result) => result.map_err(|err| self.translator.translate(&ctx, endpoint.name(), err)),
            Err(payload) => Err(self.translator.translate_panic(&ctx, endpoint.name(), payload)),
        };

        match outcome {
            Ok(value) => Reply::ok(value),
            Err(envelope) => Reply::error(envelope),
        }
    }

    fn process<R: Request>(&self, endpoint: &Endpoint<R>, ctx: &Ctx, request: &R) -> Result<R::Response, Error> {
        endpoint.gate(ctx, request).check(self.store.as_ref())?;
        self.dispatcher.dispatch(ctx, request)
    }
}

impl std::fmt::Debug for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boundary")
            .field("dispatcher", &self.dispatcher)
            .field("config", self.translator.config())
            .finish()
    }
}
