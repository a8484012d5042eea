//! Behavior chain wrapped around a handler.

use std::sync::Arc;

use crate::context::Ctx;
use crate::error::Error;
use crate::request::Request;

use super::Handler;

/// A stage wrapped around handler invocation.
///
/// A behavior either forwards by calling [`Next::run`] or short-circuits by
/// returning without it. `Next` is consumed by `run`, so a behavior can reach
/// the handler at most once.
pub trait Behavior<R: Request>: Send + Sync {
    /// Processes the request, optionally forwarding to the rest of the chain.
    fn handle(&self, ctx: &Ctx, request: &R, next: Next<'_, R>) -> Result<R::Response, Error>;
}

/// The remainder of a pipeline: the behaviors still to run, then the handler.
pub struct Next<'a, R: Request> {
    behaviors: &'a [Arc<dyn Behavior<R>>],
    handler: &'a dyn Handler<R>,
}

impl<'a, R: Request> Next<'a, R> {
    /// Runs the next behavior, or the handler once every behavior has run.
    pub fn run(self, ctx: &Ctx, request: &R) -> Result<R::Response, Error> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => behavior.handle(
                ctx,
                request,
                Next {
                    behaviors: rest,
                    handler: self.handler,
                },
            ),
            None => self.handler.handle(ctx, request),
        }
    }

    /// Number of behaviors still to run before the handler.
    pub fn remaining(&self) -> usize {
        self.behaviors.len()
    }
}

/// A composed route: an ordered behavior chain ending in one handler.
pub(crate) struct Pipeline<R: Request> {
    behaviors: Vec<Arc<dyn Behavior<R>>>,
    handler: Arc<dyn Handler<R>>,
}

impl<R: Request> Pipeline<R> {
    pub(crate) fn new(behaviors: Vec<Arc<dyn Behavior<R>>>, handler: Arc<dyn Handler<R>>) -> Self {
        Self { behaviors, handler }
    }

    pub(crate) fn run(&self, ctx: &Ctx, request: &R) -> Result<R::Response, Error> {
        Next {
            behaviors: &self.behaviors,
            handler: self.handler.as_ref(),
        }
        .run(ctx, request)
    }
}
