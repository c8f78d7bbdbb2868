//! User store: typed queries over the users table.

use crate::error::AppError;
use crate::model::{NewPost, Post, User, UserWithPosts};
use sqlx::PgPool;

pub struct UserStore;

impl UserStore {
    /// Insert a user and its initial drafts in one transaction. A failure on any
    /// draft rolls back the user row as well.
    pub async fn create_with_posts(
        pool: &PgPool,
        email: &str,
        name: Option<&str>,
        drafts: &[NewPost],
    ) -> Result<UserWithPosts, AppError> {
        let mut tx = pool.begin().await?;
        let user: User = sqlx::query_as(
            "INSERT INTO users (email, name) VALUES ($1, $2) \
             RETURNING id, email, name, created_at, updated_at",
        )
        .bind(email)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let mut posts = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let post: Post = sqlx::query_as(
                "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) \
                 RETURNING id, created_at, updated_at, title, content, published, view_count, author_id",
            )
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await?;
            posts.push(post);
        }
        tx.commit().await?;
        Ok(UserWithPosts { user, posts })
    }

    /// All users ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as(
            "SELECT id, email, name, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
        Ok(users)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Unpublished posts for one author. The caller is expected to have checked
    /// that the user exists.
    pub async fn drafts(pool: &PgPool, user_id: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as(
            "SELECT id, created_at, updated_at, title, content, published, view_count, author_id \
             FROM posts WHERE author_id = $1 AND published = FALSE ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }
}
