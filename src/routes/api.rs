//! Public API routes, fixed paths.

use crate::handlers::posts::{
    create_post, delete_post, feed, get_post, increment_views, toggle_publish,
};
use crate::handlers::users::{drafts, list_users, signup};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/post", post(create_post))
        .route("/post/:id", get(get_post).delete(delete_post))
        .route("/post/:id/views", put(increment_views))
        .route("/publish/:id", put(toggle_publish))
        .route("/users", get(list_users))
        .route("/user/:id/drafts", get(drafts))
        .route("/feed", get(feed))
        .with_state(state)
}
