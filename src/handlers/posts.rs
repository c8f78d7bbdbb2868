//! Post endpoints: create, read, view counter, publish toggle, delete, feed.

use crate::error::AppError;
use crate::service::{validation, FeedQuery, PostStore, SortOrder};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub title: String,
    pub content: Option<String>,
    pub author_email: String,
}

/// Raw feed query params. Numeric fields arrive as strings and are parsed
/// leniently: a malformed or non-positive number means "no constraint".
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub search_string: Option<String>,
    pub skip: Option<String>,
    pub take: Option<String>,
    pub order_by: Option<String>,
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<CreatePostBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::require_title(&body.title)?;
    validation::require_email(&body.author_email)?;
    let post = PostStore::create(
        &state.pool,
        &body.title,
        body.content.as_deref(),
        &body.author_email,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    // Missing id is not an error here: the body is the post or JSON null.
    let post = PostStore::find(&state.pool, id).await?;
    Ok(Json(post))
}

pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let post = PostStore::increment_views(&state.pool, id).await?;
    Ok(Json(post))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let post = PostStore::toggle_published(&state.pool, id).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let post = PostStore::delete(&state.pool, id).await?;
    Ok(Json(post))
}

pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let query = FeedQuery {
        search: params.search_string.filter(|s| !s.is_empty()),
        skip: lenient_i64(params.skip.as_deref()),
        take: lenient_i64(params.take.as_deref()),
        order: Some(SortOrder::parse(params.order_by.as_deref())),
    };
    let posts = PostStore::feed(&state.pool, &query).await?;
    Ok(Json(posts))
}

/// Parse a numeric query param; malformed or non-positive values become None.
fn lenient_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_accepts_positive_numbers() {
        assert_eq!(lenient_i64(Some("3")), Some(3));
        assert_eq!(lenient_i64(Some("40")), Some(40));
    }

    #[test]
    fn lenient_parse_drops_garbage() {
        assert_eq!(lenient_i64(Some("abc")), None);
        assert_eq!(lenient_i64(Some("")), None);
        assert_eq!(lenient_i64(Some("1.5")), None);
        assert_eq!(lenient_i64(None), None);
    }

    #[test]
    fn lenient_parse_drops_non_positive() {
        assert_eq!(lenient_i64(Some("0")), None);
        assert_eq!(lenient_i64(Some("-2")), None);
    }

    #[test]
    fn create_body_uses_camel_case_author_email() {
        let body: CreatePostBody = serde_json::from_str(
            r#"{"title":"Hi","content":"World","authorEmail":"alice@x.com"}"#,
        )
        .unwrap();
        assert_eq!(body.author_email, "alice@x.com");
    }
}
