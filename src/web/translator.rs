//! Conversion of pipeline failures into the external error contract.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt::Write as _;

use crate::config::BoundaryConfig;
use crate::context::Ctx;
use crate::error::Error;
use crate::store::StoreError;

use super::ErrorEnvelope;

/// Maps every [`Error`] (and caught panic) to an [`ErrorEnvelope`].
///
/// Validation failures, policy denials and missing resources keep their
/// kind. Every other failure is logged in full at `error` level and replaced
/// by the configured generic message.
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator {
    config: BoundaryConfig,
}

impl ErrorTranslator {
    /// Creates a translator with the given settings.
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    /// Returns the translator's settings.
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Translates a failure raised while serving `endpoint`.
    pub fn translate(&self, ctx: &Ctx, endpoint: &str, err: Error) -> ErrorEnvelope {
        let log = ctx.log();
        match err {
            Error::Validation(errors) => ErrorEnvelope::ValidationFailed {
                errors: errors.into_vec(),
            },
            Error::Violation(violation) => {
                log.debug(format_args!("{} refused: {}", endpoint, violation));
                ErrorEnvelope::forbidden()
            }
            Error::NotFound { message } if !message.trim().is_empty() => {
                ErrorEnvelope::NotFound { message }
            }
            Error::NotFound { .. } | Error::Store(StoreError::NotFound(_)) => {
                ErrorEnvelope::NotFound {
                    message: self.config.not_found_message.clone(),
                }
            }
            other => {
                log.error(format_args!(
                    "unhandled failure in {}: {}",
                    endpoint,
                    error_chain(&other)
                ));
                self.unhandled()
            }
        }
    }

    /// Translates a panic payload caught at the boundary.
    pub fn translate_panic(&self, ctx: &Ctx, endpoint: &str, payload: Box<dyn Any + Send>) -> ErrorEnvelope {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        ctx.log().error(format_args!(
            "handler panicked in {}: {}",
            endpoint, detail
        ));
        self.unhandled()
    }

    fn unhandled(&self) -> ErrorEnvelope {
        ErrorEnvelope::Unhandled {
            message: self.config.unhandled_message.clone(),
        }
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, ": caused by: {}", cause);
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Violation, ViolationKind};
    use crate::policy::Policy;
    use crate::request::RequestMeta;
    use crate::store::ResourceId;
    use crate::validation::FieldError;
    use crate::web::ErrorKind;

    fn ctx() -> Ctx {
        Ctx::new(RequestMeta {
            request_id: "req-translate".to_string(),
            principal: None,
        })
    }

    fn translate(err: Error) -> ErrorEnvelope {
        ErrorTranslator::default().translate(&ctx(), "PUT /activities/{id}", err)
    }

    #[test]
    fn validation_failures_pass_through() {
        let envelope = translate(Error::Validation(
            vec![
                FieldError::new("title", "required"),
                FieldError::new("city", "required"),
            ]
            .into(),
        ));

        assert_eq!(envelope.kind(), ErrorKind::ValidationFailed);
        assert_eq!(envelope.field_errors().len(), 2);
    }

    #[test]
    fn every_violation_is_forbidden() {
        let not_host = Violation::new(
            ViolationKind::Forbidden {
                policy: Policy::IsResourceHost,
            },
            "u2 is not the host of '7'",
        );
        let anonymous = Violation::new(ViolationKind::Unauthenticated, "no principal");

        assert_eq!(translate(not_host.into()), ErrorEnvelope::forbidden());
        assert_eq!(translate(anonymous.into()), ErrorEnvelope::forbidden());
    }

    #[test]
    fn not_found_keeps_message_or_falls_back() {
        assert_eq!(
            translate(Error::not_found("Activity 7 not found")),
            ErrorEnvelope::NotFound {
                message: "Activity 7 not found".to_string()
            }
        );
        assert_eq!(
            translate(Error::not_found("")),
            ErrorEnvelope::NotFound {
                message: "Resource not found".to_string()
            }
        );
        assert_eq!(
            translate(StoreError::NotFound(ResourceId::from(7u64)).into()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn internal_failures_are_generic() {
        let envelope = translate(Error::internal("password=hunter2 rejected by db"));

        assert_eq!(envelope.kind(), ErrorKind::Unhandled);
        assert_eq!(envelope.message(), Some("An unexpected error occurred"));
        assert!(!envelope.to_json().unwrap().to_string().contains("hunter2"));
    }

    #[test]
    fn store_outage_and_missing_handler_are_unhandled() {
        let outage = translate(StoreError::Unavailable("pool exhausted".into()).into());
        let missing = translate(Error::MissingHandler { request: "Ping" });

        assert_eq!(outage.kind(), ErrorKind::Unhandled);
        assert_eq!(missing.kind(), ErrorKind::Unhandled);
    }

    #[test]
    fn configured_message_is_used() {
        let translator = ErrorTranslator::new(BoundaryConfig {
            unhandled_message: "Try again later".to_string(),
            ..BoundaryConfig::default()
        });

        let envelope = translator.translate(&ctx(), "GET /activities", Error::internal("boom"));
        assert_eq!(envelope.message(), Some("Try again later"));
    }

    #[test]
    fn panic_payloads_are_generic() {
        let translator = ErrorTranslator::default();

        let from_str = translator.translate_panic(&ctx(), "GET /activities", Box::new("index out of bounds"));
        let from_string = translator.translate_panic(&ctx(), "GET /activities", Box::new(String::from("oops")));
        let opaque = translator.translate_panic(&ctx(), "GET /activities", Box::new(42u8));

        for envelope in [from_str, from_string, opaque] {
            assert_eq!(envelope.kind(), ErrorKind::Unhandled);
            assert_eq!(envelope.message(), Some("An unexpected error occurred"));
        }
    }

    #[test]
    fn error_chain_includes_sources() {
        let err: Error = StoreError::Unavailable("socket closed".into()).into();
        let chain = error_chain(&err);

        assert!(chain.contains("store unavailable"));
        assert!(chain.contains("socket closed"));
    }
}
