//! Schema-driven admin API generator.
//!
//! Given a declarative resource registry (for this service: users and posts,
//! plus the publish record action), this module mounts a full CRUD router under
//! a configurable root path. `GET {root}/resources` serves the schemas a
//! generic admin front end renders its listings, forms, and action buttons
//! from; the rendering itself lives in the front end, not here.

pub mod actions;
pub mod crud;
pub mod handlers;
pub mod params;
pub mod resource;
pub mod sql;

pub use actions::{ActionOutcome, Notice, PublishAction, RecordAction};
pub use crud::CrudService;
pub use handlers::AdminState;
pub use resource::{blog_registry, AdminOp, AdminRegistry, AdminResource, ColumnSpec, ResourceSpec};

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn admin_routes(state: AppState, registry: AdminRegistry) -> Router {
    Router::new()
        .route("/resources", get(handlers::describe_resources))
        .route("/:resource", get(handlers::list).post(handlers::create))
        .route(
            "/:resource/:id",
            get(handlers::read)
                .patch(handlers::update)
                .delete(handlers::delete_record),
        )
        .route("/:resource/:id/actions/:action", post(handlers::run_action))
        .with_state(AdminState::new(state, registry))
}
