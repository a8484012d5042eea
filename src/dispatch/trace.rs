use std::time::Instant;

use crate::context::Ctx;
use crate::error::Error;
use crate::request::Request;

use super::{Behavior, Next};

/// Outermost stage of every route: records entry into and exit from the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBehavior;

impl<R: Request> Behavior<R> for TracingBehavior {
    fn handle(&self, ctx: &Ctx, request: &R, next: Next<'_, R>) -> Result<R::Response, Error> {
        let log = ctx.log();
        let started = Instant::now();
        log.debug(format_args!("dispatching {}", R::name()));

        let result = next.run(ctx, request);

        let outcome = if result.is_ok() { "ok" } else { "error" };
        log.debug(format_args!(
            "{} finished ({}) in {:?}",
            R::name(),
            outcome,
            started.elapsed()
        ));
        result
    }
}
