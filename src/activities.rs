//! Activities: a small hosted-resource domain wired through the pipeline.
//!
//! | Endpoint                    | Request            | Policy             |
//! |-----------------------------|--------------------|--------------------|
//! | `POST /activities`          | `CreateActivity`   | authenticated      |
//! | `GET /activities`           | `ListActivities`   | none               |
//! | `GET /activities/{id}`      | `ActivityDetails`  | none               |
//! | `PUT /activities/{id}`      | `UpdateActivity`   | `is-resource-host` |
//! | `DELETE /activities/{id}`   | `DeleteActivity`   | `is-resource-host` |
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use pipeline_core::activities::{self, ActivityEndpoints, ActivityInput, ActivityStore, CreateActivity};
//! use pipeline_core::web::RequestAdapter;
//! use pipeline_core::Principal;
//!
//! let store = Arc::new(ActivityStore::new());
//! let boundary = activities::compose(store.clone()).expect("routes are unique");
//! let endpoints = ActivityEndpoints::new();
//!
//! let caller = RequestAdapter::new("req-1").with_principal(Principal::new("u1"));
//! let reply = boundary.call(
//!     &endpoints.create,
//!     &caller,
//!     CreateActivity {
//!         activity: ActivityInput {
//!             title: "Run".to_string(),
//!             description: "5k".to_string(),
//!             category: "sport".to_string(),
//!             city: "Leeds".to_string(),
//!             venue: "Park".to_string(),
//!         },
//!     },
//! );
//!
//! assert!(reply.is_success());
//! assert_eq!(store.get(1).unwrap().host_id, "u1");
//! ```

mod store;

use std::sync::Arc;

use crate::context::Ctx;
use crate::dispatch::{CompositionError, Dispatcher, Route};
use crate::error::Error;
use crate::policy::Policy;
use crate::request::Request;
use crate::validation::{Rule, Rules};
use crate::web::{Boundary, Endpoint};

pub use store::{Activity, ActivityInput, ActivityStore};

/// Longest accepted activity title, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Creates an activity hosted by the caller.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    /// Fields of the new activity
    pub activity: ActivityInput,
}

impl Request for CreateActivity {
    type Response = Activity;
}

/// Replaces the fields of an existing activity.
#[derive(Debug, Clone)]
pub struct UpdateActivity {
    /// Activity to edit
    pub id: u64,
    /// New field values
    pub activity: ActivityInput,
}

impl Request for UpdateActivity {
    type Response = Activity;
}

/// Deletes an activity.
#[derive(Debug, Clone)]
pub struct DeleteActivity {
    /// Activity to delete
    pub id: u64,
}

impl Request for DeleteActivity {
    type Response = ();
}

/// Fetches one activity.
#[derive(Debug, Clone)]
pub struct ActivityDetails {
    /// Activity to fetch
    pub id: u64,
}

impl Request for ActivityDetails {
    type Response = Activity;
}

/// Lists every activity.
#[derive(Debug, Clone, Default)]
pub struct ListActivities;

impl Request for ListActivities {
    type Response = Vec<Activity>;
}

/// The external operations of the activities domain.
#[derive(Debug)]
pub struct ActivityEndpoints {
    /// `POST /activities`
    pub create: Endpoint<CreateActivity>,
    /// `PUT /activities/{id}`
    pub update: Endpoint<UpdateActivity>,
    /// `DELETE /activities/{id}`
    pub delete: Endpoint<DeleteActivity>,
    /// `GET /activities/{id}`
    pub details: Endpoint<ActivityDetails>,
    /// `GET /activities`
    pub list: Endpoint<ListActivities>,
}

impl ActivityEndpoints {
    /// Declares the endpoints; edits and deletes are host-only.
    pub fn new() -> Self {
        Self {
            create: Endpoint::new("POST /activities"),
            update: Endpoint::<UpdateActivity>::new("PUT /activities/{id}")
                .protected_by(Policy::IsResourceHost, |r| r.id.into()),
            delete: Endpoint::<DeleteActivity>::new("DELETE /activities/{id}")
                .protected_by(Policy::IsResourceHost, |r| r.id.into()),
            details: Endpoint::new("GET /activities/{id}"),
            list: Endpoint::new("GET /activities"),
        }
    }
}

impl Default for ActivityEndpoints {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation rules shared by create and update.
fn input_rules<R: 'static>(input: fn(&R) -> &ActivityInput) -> Rules<R> {
    Rules::new()
        .field(
            "title",
            move |r| input(r).title.as_str(),
            [Rule::Required, Rule::MaxLength(TITLE_MAX_LEN)],
        )
        .field("description", move |r| input(r).description.as_str(), [Rule::Required])
        .field("category", move |r| input(r).category.as_str(), [Rule::Required])
        .field("city", move |r| input(r).city.as_str(), [Rule::Required])
        .field("venue", move |r| input(r).venue.as_str(), [Rule::Required])
}

/// Registers one route per activities request against `store`.
///
/// # Errors
///
/// Returns `CompositionError` if a request type ends up registered twice.
pub fn dispatcher(store: Arc<ActivityStore>) -> Result<Dispatcher, CompositionError> {
    let create_store = Arc::clone(&store);
    let update_store = Arc::clone(&store);
    let delete_store = Arc::clone(&store);
    let details_store = Arc::clone(&store);
    let list_store = store;

    Dispatcher::builder()
        .route(
            Route::<CreateActivity>::new(move |ctx: &Ctx, req: &CreateActivity| -> Result<Activity, Error> {
                let host = ctx.require_principal()?;
                let activity = create_store.insert(host.id.clone(), req.activity.clone());
                ctx.log()
                    .info(format_args!("activity {} created by {}", activity.id, host));
                Ok(activity)
            })
            .validator(input_rules::<CreateActivity>(|r| &r.activity)),
        )
        .route(
            Route::<UpdateActivity>::new(move |ctx: &Ctx, req: &UpdateActivity| -> Result<Activity, Error> {
                let activity = update_store.update(req.id, req.activity.clone())?;
                ctx.log().info(format_args!("activity {} updated", activity.id));
                Ok(activity)
            })
            .validator(input_rules::<UpdateActivity>(|r| &r.activity)),
        )
        .route(Route::<DeleteActivity>::new(
            move |ctx: &Ctx, req: &DeleteActivity| -> Result<(), Error> {
                delete_store.remove(req.id)?;
                ctx.log().info(format_args!("activity {} deleted", req.id));
                Ok(())
            },
        ))
        .route(Route::<ActivityDetails>::new(
            move |_: &Ctx, req: &ActivityDetails| -> Result<Activity, Error> {
                details_store
                    .get(req.id)
                    .ok_or_else(|| Error::not_found(format!("Activity {} not found", req.id)))
            },
        ))
        .route(Route::<ListActivities>::new(
            move |_: &Ctx, _: &ListActivities| -> Result<Vec<Activity>, Error> { Ok(list_store.list()) },
        ))
        .build()
}

/// Composition root: the activities dispatcher hosted behind a [`Boundary`].
///
/// # Errors
///
/// Returns `CompositionError` if the dispatcher cannot be composed.
pub fn compose(store: Arc<ActivityStore>) -> Result<Boundary, CompositionError> {
    let dispatcher = dispatcher(Arc::clone(&store))?;
    Ok(Boundary::new(dispatcher, store))
}
