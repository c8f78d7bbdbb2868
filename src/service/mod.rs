//! Typed data access over the blog tables, plus request-input validation.

pub mod posts;
pub mod users;
pub mod validation;

pub use posts::{FeedQuery, PostStore, SortOrder};
pub use users::UserStore;
