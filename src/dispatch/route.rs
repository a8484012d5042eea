use std::sync::Arc;

use crate::request::Request;
use crate::validation::{ValidationBehavior, Validator, ValidatorSet};

use super::pipeline::Pipeline;
use super::{Behavior, Handler, TracingBehavior};

/// One request type's registration: its handler, validators and extra behaviors.
///
/// Stage order is fixed when the route is composed:
/// `TracingBehavior` → `ValidationBehavior` → custom behaviors (in the order
/// added) → handler.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Ctx, Error, Request, Route, Rule, Rules};
///
/// #[derive(Debug)]
/// struct Rename {
///     title: String,
/// }
///
/// impl Request for Rename {
///     type Response = String;
/// }
///
/// let route = Route::<Rename>::new(|_: &Ctx, r: &Rename| -> Result<String, Error> { Ok(r.title.clone()) })
///     .validator(Rules::<Rename>::new().field("title", |r: &Rename| r.title.as_str(), [Rule::Required]));
///
/// assert_eq!(route.validator_count(), 1);
/// ```
pub struct Route<R: Request> {
    handler: Arc<dyn Handler<R>>,
    validators: ValidatorSet<R>,
    behaviors: Vec<Arc<dyn Behavior<R>>>,
}

impl<R: Request> Route<R> {
    /// Creates a route for the given handler with no validators.
    pub fn new(handler: impl Handler<R> + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            validators: ValidatorSet::new(),
            behaviors: Vec::new(),
        }
    }

    /// Registers a validator for this request type.
    pub fn validator(mut self, validator: impl Validator<R> + 'static) -> Self {
        self.validators.push(validator);
        self
    }

    /// Appends a behavior after validation.
    pub fn behavior(mut self, behavior: impl Behavior<R> + 'static) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    /// Number of validators registered on this route.
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub(crate) fn into_pipeline(self) -> Pipeline<R> {
        let mut behaviors: Vec<Arc<dyn Behavior<R>>> = Vec::with_capacity(self.behaviors.len() + 2);
        behaviors.push(Arc::new(TracingBehavior));
        behaviors.push(Arc::new(ValidationBehavior::new(self.validators)));
        behaviors.extend(self.behaviors);
        Pipeline::new(behaviors, self.handler)
    }
}
