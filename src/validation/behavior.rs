use crate::context::Ctx;
use crate::dispatch::{Behavior, Next};
use crate::error::Error;
use crate::request::Request;

use super::ValidatorSet;

/// Pipeline stage that rejects invalid requests before they reach the handler.
///
/// Every validator registered for the request type runs; only when all of
/// them have reported does the behavior either forward the request unchanged
/// or short-circuit with `Error::Validation` carrying every failure.
#[derive(Debug)]
pub struct ValidationBehavior<R> {
    validators: ValidatorSet<R>,
}

impl<R> ValidationBehavior<R> {
    /// Creates the behavior over a validator set.
    pub fn new(validators: ValidatorSet<R>) -> Self {
        Self { validators }
    }
}

impl<R: Request> Behavior<R> for ValidationBehavior<R> {
    fn handle(&self, ctx: &Ctx, request: &R, next: Next<'_, R>) -> Result<R::Response, Error> {
        let failures = self.validators.validate(request);
        if !failures.is_empty() {
            ctx.log().debug(format_args!(
                "{} rejected by validation: {}",
                R::name(),
                failures
            ));
            return Err(Error::Validation(failures));
        }
        next.run(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Dispatcher, Route};
    use crate::request::RequestMeta;
    use crate::validation::{Rule, Rules, ValidationErrors};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Publish {
        title: String,
        city: String,
    }

    impl Request for Publish {
        type Response = ();
    }

    fn ctx() -> Ctx {
        Ctx::new(RequestMeta {
            request_id: "req-validate".to_string(),
            principal: None,
        })
    }

    fn dispatcher(calls: &Arc<AtomicUsize>, with_rules: bool) -> Dispatcher {
        let calls = Arc::clone(calls);
        let mut route = Route::<Publish>::new(move |_: &Ctx, _: &Publish| -> Result<(), Error> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        if with_rules {
            route = route
                .validator(Rules::<Publish>::new().field(
                    "title",
                    |p: &Publish| p.title.as_str(),
                    [Rule::Required],
                ))
                .validator(|p: &Publish| {
                    let mut errors = ValidationErrors::new();
                    if p.city.trim().is_empty() {
                        errors.push("city", "required");
                    }
                    errors
                });
        }
        Dispatcher::builder().route(route).build().unwrap()
    }

    fn publish(title: &str, city: &str) -> Publish {
        Publish {
            title: title.to_string(),
            city: city.to_string(),
        }
    }

    #[test]
    fn collects_failures_from_all_validators() {
        let calls = Arc::new(AtomicUsize::new(0));
        let err = dispatcher(&calls, true)
            .dispatch(&ctx(), &publish("", " "))
            .unwrap_err();

        match err {
            Error::Validation(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), ["title", "city"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn valid_request_is_forwarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        dispatcher(&calls, true)
            .dispatch(&ctx(), &publish("Run", "Leeds"))
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_validators_means_always_valid() {
        let calls = Arc::new(AtomicUsize::new(0));
        dispatcher(&calls, false)
            .dispatch(&ctx(), &publish("", ""))
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
