//! Pressroom: blog REST backend with a schema-driven admin API on PostgreSQL.

pub mod admin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use admin::{admin_routes, blog_registry};
pub use config::Config;
pub use error::AppError;
pub use routes::{api_routes, common_routes};
pub use service::{PostStore, UserStore};
pub use state::AppState;
pub use store::{apply_migrations, ensure_database_exists};
