//! Post store: typed queries over the posts table, including the feed.

use crate::error::AppError;
use crate::model::{FeedPost, Post, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const POST_COLUMNS: &str =
    "id, created_at, updated_at, title, content, published, view_count, author_id";

/// Sort direction for the feed, by `updated_at`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Lenient parse: anything other than asc/desc falls back to descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parameters for the feed listing. Absent limit/offset mean no constraint.
#[derive(Clone, Debug, Default)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub order: Option<SortOrder>,
}

pub struct PostStore;

impl PostStore {
    /// Insert a post connected to its author by unique email.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        content: Option<&str>,
        author_email: &str,
    ) -> Result<Post, AppError> {
        let author: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(author_email)
            .fetch_optional(pool)
            .await?;
        let (author_id,) = author.ok_or_else(|| {
            AppError::NotFound(format!("user with email {} does not exist", author_email))
        })?;

        let post = sqlx::query_as(&format!(
            "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        ))
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(pool)
        .await?;
        Ok(post)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as(&format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    /// Atomic in-database increment; the counter never skips or repeats under
    /// concurrent calls.
    pub async fn increment_views(pool: &PgPool, id: i64) -> Result<Post, AppError> {
        let post: Option<Post> = sqlx::query_as(&format!(
            "UPDATE posts SET view_count = view_count + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        post.ok_or_else(|| AppError::NotFound(format!("post with id {} does not exist", id)))
    }

    /// Atomic flip of `published`. Two concurrent toggles cannot observe the same
    /// prior value; the negation happens inside the UPDATE.
    pub async fn toggle_published(pool: &PgPool, id: i64) -> Result<Post, AppError> {
        let post: Option<Post> = sqlx::query_as(&format!(
            "UPDATE posts SET published = NOT published, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        post.ok_or_else(|| AppError::NotFound(format!("post with id {} does not exist", id)))
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<Post, AppError> {
        let post: Option<Post> = sqlx::query_as(&format!(
            "DELETE FROM posts WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        post.ok_or_else(|| AppError::NotFound(format!("post with id {} does not exist", id)))
    }

    /// Published posts with their author embedded, optionally filtered by a
    /// case-insensitive substring match on title or content, ordered by
    /// `updated_at`, paginated by take/skip.
    pub async fn feed(pool: &PgPool, query: &FeedQuery) -> Result<Vec<FeedPost>, AppError> {
        let order = query.order.unwrap_or(SortOrder::Desc);
        let sql = feed_sql(
            query.search.is_some(),
            order,
            query.take.is_some(),
            query.skip.is_some(),
        );
        tracing::debug!(sql = %sql, "query");

        let mut q = sqlx::query_as::<_, FeedRow>(&sql);
        if let Some(ref s) = query.search {
            q = q.bind(format!("%{}%", escape_like(s)));
        }
        if let Some(take) = query.take {
            q = q.bind(take);
        }
        if let Some(skip) = query.skip {
            q = q.bind(skip);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(FeedRow::into_feed_post).collect())
    }
}

/// Feed SQL with placeholders numbered in bind order: search pattern, take, skip.
fn feed_sql(has_search: bool, order: SortOrder, has_take: bool, has_skip: bool) -> String {
    let mut sql = String::from(
        "SELECT p.id, p.created_at, p.updated_at, p.title, p.content, p.published, \
         p.view_count, p.author_id, \
         u.email AS author_email, u.name AS author_name, \
         u.created_at AS author_created_at, u.updated_at AS author_updated_at \
         FROM posts p JOIN users u ON u.id = p.author_id \
         WHERE p.published = TRUE",
    );
    let mut param = 0u32;
    if has_search {
        param += 1;
        sql.push_str(&format!(
            " AND (p.title ILIKE ${n} ESCAPE '\\' OR p.content ILIKE ${n} ESCAPE '\\')",
            n = param
        ));
    }
    sql.push_str(&format!(" ORDER BY p.updated_at {}", order.as_sql()));
    if has_take {
        param += 1;
        sql.push_str(&format!(" LIMIT ${}", param));
    }
    if has_skip {
        param += 1;
        sql.push_str(&format!(" OFFSET ${}", param));
    }
    sql
}

/// Escape LIKE metacharacters so the search string matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Flat row for the feed join; split into post and author halves.
#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    title: String,
    content: Option<String>,
    published: bool,
    view_count: i32,
    author_id: i64,
    author_email: String,
    author_name: Option<String>,
    author_created_at: DateTime<Utc>,
    author_updated_at: DateTime<Utc>,
}

impl FeedRow {
    fn into_feed_post(self) -> FeedPost {
        FeedPost {
            author: User {
                id: self.author_id,
                email: self.author_email,
                name: self.author_name,
                created_at: self.author_created_at,
                updated_at: self.author_updated_at,
            },
            post: Post {
                id: self.id,
                created_at: self.created_at,
                updated_at: self.updated_at,
                title: self.title,
                content: self.content,
                published: self.published,
                view_count: self.view_count,
                author_id: self.author_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_leniently() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn feed_sql_without_constraints() {
        let sql = feed_sql(false, SortOrder::Desc, false, false);
        assert!(sql.contains("WHERE p.published = TRUE"));
        assert!(sql.ends_with("ORDER BY p.updated_at DESC"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn feed_sql_numbers_params_in_bind_order() {
        let sql = feed_sql(true, SortOrder::Asc, true, true);
        assert!(sql.contains("p.title ILIKE $1"));
        assert!(sql.contains("p.content ILIKE $1"));
        assert!(sql.contains("LIMIT $2"));
        assert!(sql.contains("OFFSET $3"));
        assert!(sql.contains("ORDER BY p.updated_at ASC"));
    }

    #[test]
    fn feed_sql_skip_only() {
        let sql = feed_sql(false, SortOrder::Desc, false, true);
        assert!(!sql.contains("LIMIT"));
        assert!(sql.contains("OFFSET $1"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
