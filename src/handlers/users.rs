//! User endpoints: signup, listing, drafts.

use crate::error::AppError;
use crate::model::NewPost;
use crate::service::{validation, UserStore};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    pub name: Option<String>,
    pub email: String,
    /// Optional drafts created alongside the user, in the same transaction.
    #[serde(default)]
    pub posts: Vec<NewPost>,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::require_email(&body.email)?;
    for draft in &body.posts {
        validation::require_title(&draft.title)?;
    }
    if UserStore::find_by_email(&state.pool, &body.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "email {} is already registered",
            body.email
        )));
    }
    let created =
        UserStore::create_with_posts(&state.pool, &body.email, body.name.as_deref(), &body.posts)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let users = UserStore::list(&state.pool).await?;
    Ok(Json(users))
}

pub async fn drafts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    UserStore::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id {} does not exist", id)))?;
    let drafts = UserStore::drafts(&state.pool, id).await?;
    Ok(Json(drafts))
}
