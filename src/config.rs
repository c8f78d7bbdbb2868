//! Process configuration from environment variables, with code defaults.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Root path the admin router is nested under, e.g. "/admin".
    pub admin_root_path: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/pressroom".into()),
            port: env_parsed("PORT", 3000),
            admin_root_path: normalize_root_path(
                &env::var("ADMIN_ROOT_PATH").unwrap_or_else(|_| "/admin".into()),
            ),
            max_connections: env_parsed("PG_POOL_SIZE", 5),
        }
    }
}

fn env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid {} value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// A nest path must start with '/' and must not end with one.
fn normalize_root_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/admin".into();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_gains_leading_slash() {
        assert_eq!(normalize_root_path("admin"), "/admin");
    }

    #[test]
    fn root_path_drops_trailing_slash() {
        assert_eq!(normalize_root_path("/manage/"), "/manage");
    }

    #[test]
    fn empty_root_path_falls_back() {
        assert_eq!(normalize_root_path(""), "/admin");
        assert_eq!(normalize_root_path("/"), "/admin");
    }
}
