//! Typed records for the blog entities. The JSON surface is camelCase; the
//! database columns are snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub view_count: i32,
    pub author_id: i64,
}

/// Initial draft supplied inline with a signup request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
}

/// Created user with the drafts created alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
}

/// Feed entry: a published post with its author embedded.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Post {
            id: 1,
            created_at: at,
            updated_at: at,
            title: "Hi".into(),
            content: Some("World".into()),
            published: false,
            view_count: 0,
            author_id: 7,
        }
    }

    #[test]
    fn post_serializes_camel_case() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert_eq!(json["viewCount"], 0);
        assert_eq!(json["authorId"], 7);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("view_count").is_none());
    }

    #[test]
    fn feed_post_embeds_author_next_to_post_fields() {
        let post = sample_post();
        let author = User {
            id: 7,
            email: "alice@x.com".into(),
            name: Some("Alice".into()),
            created_at: post.created_at,
            updated_at: post.updated_at,
        };
        let json = serde_json::to_value(FeedPost { post, author }).unwrap();
        assert_eq!(json["title"], "Hi");
        assert_eq!(json["author"]["email"], "alice@x.com");
    }
}
