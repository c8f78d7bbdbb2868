//! Server entry point: bootstraps the database, then serves the public API and
//! the admin router from one listener.

use axum::Router;
use pressroom::{
    admin_routes, api_routes, apply_migrations, blog_registry, common_routes,
    ensure_database_exists, AppState, Config,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pressroom=info".parse()?))
        .init();

    let config = Config::from_env();
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    apply_migrations(&pool).await?;

    let state = AppState { pool };
    let app = Router::new()
        .merge(common_routes(state.clone()))
        .merge(api_routes(state.clone()))
        .nest(&config.admin_root_path, admin_routes(state, blog_registry()))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        "listening on {}, admin at {}",
        listener.local_addr()?,
        config.admin_root_path
    );
    axum::serve(listener, app).await?;
    Ok(())
}
