//! Integration property tests for pipeline-core.
//!
//! These tests validate cross-module invariants of the request pipeline
//! using property-based testing.

use std::io;
use std::sync::Arc;

use pipeline_core::activities::{self, ActivityEndpoints, ActivityInput, ActivityStore, CreateActivity, UpdateActivity};
use pipeline_core::web::{Boundary, Endpoint, ErrorEnvelope, ErrorKind, RequestAdapter, FORBIDDEN_MESSAGE};
use pipeline_core::{Ctx, Decision, Dispatcher, Error, Policy, Principal, ResourceRef, Route, Rule};
use proptest::prelude::*;
use serde_json::json;

const FIELDS: [&str; 5] = ["title", "description", "category", "city", "venue"];

// Strategy: Generate arbitrary principal ids
fn arb_principal_id() -> impl Strategy<Value = String> {
    prop::string::string_regex("u[a-z0-9]{1,8}").unwrap()
}

// Strategy: Generate a field value that passes every rule
fn arb_valid_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 ]{0,40}").unwrap()
}

// Strategy: Generate a blank field value
fn arb_blank_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \\t]{0,5}").unwrap()
}

// Strategy: Generate activity input where the masked fields are blank
fn arb_input_with_blanks() -> impl Strategy<Value = (ActivityInput, Vec<&'static str>)> {
    (
        prop::array::uniform5(any::<bool>()).prop_filter("at least one blank field", |m| m.iter().any(|b| *b)),
        prop::collection::vec(arb_valid_text(), 5),
        prop::collection::vec(arb_blank_text(), 5),
    )
        .prop_map(|(mask, valid, blank)| {
            let pick = |i: usize| if mask[i] { blank[i].clone() } else { valid[i].clone() };
            let input = ActivityInput {
                title: pick(0),
                description: pick(1),
                category: pick(2),
                city: pick(3),
                venue: pick(4),
            };
            let invalid = FIELDS.iter().zip(mask).filter(|(_, m)| *m).map(|(f, _)| *f).collect();
            (input, invalid)
        })
}

fn valid_input() -> ActivityInput {
    ActivityInput {
        title: "Run".to_string(),
        description: "5k".to_string(),
        category: "sport".to_string(),
        city: "Leeds".to_string(),
        venue: "Park".to_string(),
    }
}

fn hosted_by(host: &str) -> (Arc<ActivityStore>, Boundary) {
    let store = Arc::new(ActivityStore::new());
    store.insert(host, valid_input());
    let boundary = activities::compose(store.clone()).unwrap();
    (store, boundary)
}

proptest! {
    /// Property: Every invalid field is reported and the handler never runs
    ///
    /// Whatever combination of fields is blank, the reply lists exactly those
    /// fields as "required", and nothing is written to the store.
    #[test]
    fn proptest_invalid_fields_all_reported(
        caller in arb_principal_id(),
        (input, invalid) in arb_input_with_blanks()
    ) {
        let store = Arc::new(ActivityStore::new());
        let boundary = activities::compose(store.clone()).unwrap();
        let endpoints = ActivityEndpoints::new();
        let adapter = RequestAdapter::new("req-prop").with_principal(Principal::new(caller));

        let reply = boundary.call(&endpoints.create, &adapter, CreateActivity { activity: input });

        let envelope = reply.envelope().expect("invalid input must fail");
        prop_assert_eq!(envelope.kind(), ErrorKind::ValidationFailed);
        let reported: Vec<&str> = envelope.field_errors().iter().map(|e| e.field.as_str()).collect();
        prop_assert_eq!(reported, invalid);
        prop_assert!(envelope.field_errors().iter().all(|e| e.message == "required"));
        prop_assert!(store.is_empty());
    }

    /// Property: Anyone but the host is refused with the same envelope
    ///
    /// The refusal does not depend on whether the activity exists or on
    /// whether the payload is valid.
    #[test]
    fn proptest_non_host_always_forbidden(
        host in arb_principal_id(),
        caller in arb_principal_id(),
        id in 1u64..4,
        title in prop::option::of(arb_valid_text())
    ) {
        prop_assume!(host != caller);
        let (store, boundary) = hosted_by(&host);
        let endpoints = ActivityEndpoints::new();
        let adapter = RequestAdapter::new("req-prop").with_principal(Principal::new(caller));
        let mut activity = valid_input();
        activity.title = title.unwrap_or_default();

        let reply = boundary.call(&endpoints.update, &adapter, UpdateActivity { id, activity });

        prop_assert_eq!(reply.status().as_u16(), 403);
        prop_assert_eq!(
            reply.to_json().unwrap(),
            json!({ "kind": "Forbidden", "message": FORBIDDEN_MESSAGE })
        );
        prop_assert_eq!(store.get(1).unwrap().title, "Run");
    }

    /// Property: is-resource-host allows exactly the owner
    #[test]
    fn proptest_is_resource_host_matches_owner(
        principal_id in arb_principal_id(),
        owner_id in arb_principal_id(),
        exists in any::<bool>()
    ) {
        let principal = Principal::new(principal_id.clone());
        let resource = ResourceRef::new(1u64, owner_id.clone());
        let decision = Policy::IsResourceHost.evaluate(Some(&principal), exists.then_some(&resource));

        let expected = if exists && principal_id == owner_id {
            Decision::Allow
        } else {
            Decision::Deny
        };
        prop_assert_eq!(decision, expected);
    }

    /// Property: Control characters are rejected wherever they appear
    ///
    /// Control characters in the middle of a value survive trimming and must
    /// still be reported.
    #[test]
    fn proptest_control_chars_rejected(
        prefix in arb_valid_text(),
        control_chars in prop::collection::vec(prop::char::range('\x00', '\x1F'), 1..3)
    ) {
        let control: String = control_chars.iter().collect();
        let value = format!("{}{}after", prefix, control);

        prop_assert!(Rule::NoControlChars.check(&value).is_some());
        prop_assert!(Rule::NoControlChars.check(&prefix).is_none());
    }

    /// Property: Unhandled failures never echo internal detail
    #[test]
    fn proptest_unhandled_reveals_nothing(
        detail in prop::string::string_regex("[a-z]{8,20}").unwrap()
    ) {
        let secret = detail.clone();
        let dispatcher = Dispatcher::builder()
            .route(Route::<UpdateActivity>::new(move |_: &Ctx, _: &UpdateActivity| -> Result<activities::Activity, Error> {
                Err(Error::internal(io::Error::new(io::ErrorKind::Other, secret.clone())))
            }))
            .build()
            .unwrap();
        let store = Arc::new(ActivityStore::new());
        let boundary = Boundary::new(dispatcher, store);

        let reply = boundary.call(
            &Endpoint::new("PUT /activities/{id}"),
            &RequestAdapter::new("req-prop"),
            UpdateActivity { id: 1, activity: valid_input() },
        );

        let envelope = reply.envelope().cloned();
        prop_assert!(matches!(envelope, Some(ErrorEnvelope::Unhandled { .. })), "expected Unhandled envelope, got {:?}", envelope);
        prop_assert!(!reply.to_json().unwrap().to_string().contains(&detail));
    }
}
