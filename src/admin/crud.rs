//! Generic CRUD execution for admin resources: builds SQL from the spec, binds
//! JSON values, and serializes rows back to JSON.

use crate::admin::params::PgBindValue;
use crate::admin::resource::ResourceSpec;
use crate::admin::sql::{self, QueryBuf};
use crate::error::AppError;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// List rows with exact-match filters, limit (default 100, max 1000), offset
    /// (default 0).
    pub async fn list(
        pool: &PgPool,
        spec: &ResourceSpec,
        filters: &[(String, Value)],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        const DEFAULT_LIMIT: u32 = 100;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(1000);
        let offset = offset.unwrap_or(0);
        let q = sql::select_list(spec, filters, limit, offset);
        Self::query_many(pool, &q).await
    }

    /// Fetch one row by primary key. Returns JSON object or None.
    pub async fn read(
        pool: &PgPool,
        spec: &ResourceSpec,
        id: &Value,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::select_by_id(spec, id);
        Self::query_optional(pool, &q).await
    }

    /// Insert one row; returns the created row.
    pub async fn create(
        pool: &PgPool,
        spec: &ResourceSpec,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        let q = sql::insert(spec, body);
        Self::query_optional(pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Update one row by id. Returns the updated row or None.
    pub async fn update(
        pool: &PgPool,
        spec: &ResourceSpec,
        id: &Value,
        body: &HashMap<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::update(spec, id, body);
        Self::query_optional(pool, &q).await
    }

    /// Delete one row by id. Returns the deleted row or None.
    pub async fn delete(
        pool: &PgPool,
        spec: &ResourceSpec,
        id: &Value,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::delete(spec, id);
        Self::query_optional(pool, &q).await
    }

    async fn query_optional(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "admin query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "admin query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
