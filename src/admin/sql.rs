//! Parameterized INSERT, SELECT, UPDATE, DELETE built from a resource spec.

use crate::admin::resource::ResourceSpec;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (safe: only from static specs).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list(spec: &ResourceSpec) -> String {
    spec.columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Placeholder with a SQL cast (e.g. `$1::timestamptz`) so string-typed JSON
/// values bind correctly against non-text columns.
fn cast_placeholder(spec: &ResourceSpec, column: &str, param_num: usize) -> String {
    match spec.column(column) {
        Some(c) => format!("${}::{}", param_num, c.pg_type),
        None => format!("${}", param_num),
    }
}

/// SELECT by primary key.
pub fn select_by_id(spec: &ResourceSpec, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.clone());
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(spec),
        quoted(spec.table),
        quoted(spec.pk_column),
        n
    );
    q
}

/// SELECT list with exact-match filters, ORDER BY pk, LIMIT/OFFSET.
/// Filters on columns not in the spec are dropped.
pub fn select_list(
    spec: &ResourceSpec,
    filters: &[(String, Value)],
    limit: u32,
    offset: u32,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        if spec.column(col).is_none() {
            continue;
        }
        let n = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", quoted(col), cast_placeholder(spec, col, n)));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT {} OFFSET {}",
        column_list(spec),
        quoted(spec.table),
        where_clause,
        quoted(spec.pk_column),
        limit,
        offset
    );
    q
}

/// INSERT from body. The primary key is always omitted (serial); columns with a
/// DB default are omitted when the body does not provide a value.
pub fn insert(spec: &ResourceSpec, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &spec.columns {
        if c.primary_key {
            continue;
        }
        let val = body.get(c.name).cloned();
        if val.is_none() && c.has_default {
            continue;
        }
        let n = q.push_param(val.unwrap_or(Value::Null));
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(spec.table),
        cols.join(", "),
        placeholders.join(", "),
        column_list(spec)
    );
    q
}

/// UPDATE by id: SET only spec columns present in body, never the primary key;
/// `updated_at` is always bumped. An empty SET degrades to a SELECT so the
/// caller still gets the row back.
pub fn update(spec: &ResourceSpec, id: &Value, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &spec.columns {
        if c.primary_key || c.name == "updated_at" {
            continue;
        }
        let Some(v) = body.get(c.name) else { continue };
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}::{}", quoted(c.name), n, c.pg_type));
    }
    if sets.is_empty() {
        return select_by_id(spec, id);
    }
    if spec.column("updated_at").is_some() {
        sets.push(format!("{} = NOW()", quoted("updated_at")));
    }
    let id_param = q.push_param(id.clone());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(spec.table),
        sets.join(", "),
        quoted(spec.pk_column),
        id_param,
        column_list(spec)
    );
    q
}

/// DELETE by id, returning the deleted row.
pub fn delete(spec: &ResourceSpec, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.clone());
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(spec.table),
        quoted(spec.pk_column),
        n,
        column_list(spec)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::resource::blog_registry;

    fn post_spec() -> ResourceSpec {
        blog_registry().by_path("posts").unwrap().spec.clone()
    }

    #[test]
    fn select_by_id_binds_one_param() {
        let q = select_by_id(&post_spec(), &Value::Number(4.into()));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"content\", \
             \"published\", \"view_count\", \"author_id\" FROM \"posts\" WHERE \"id\" = $1"
        );
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn select_list_drops_unknown_filter_columns() {
        let filters = vec![
            ("published".to_string(), Value::Bool(true)),
            ("nope".to_string(), Value::String("x".into())),
        ];
        let q = select_list(&post_spec(), &filters, 100, 0);
        assert!(q.sql.contains("WHERE \"published\" = $1::boolean"));
        assert!(!q.sql.contains("nope"));
        assert!(q.sql.ends_with("ORDER BY \"id\" LIMIT 100 OFFSET 0"));
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn insert_omits_pk_and_defaulted_columns() {
        let mut body = HashMap::new();
        body.insert("title".to_string(), Value::String("Hi".into()));
        body.insert("author_id".to_string(), Value::Number(1.into()));
        let q = insert(&post_spec(), &body);
        // pk and defaulted columns are absent; content (nullable, no default)
        // binds an explicit NULL
        assert!(q.sql.starts_with(
            "INSERT INTO \"posts\" (\"title\", \"content\", \"author_id\") \
             VALUES ($1::text, $2::text, $3::bigint) RETURNING"
        ));
        assert_eq!(q.params.len(), 3);
        assert_eq!(q.params[1], Value::Null);
    }

    #[test]
    fn update_sets_only_body_columns_and_bumps_updated_at() {
        let mut body = HashMap::new();
        body.insert("published".to_string(), Value::Bool(true));
        let q = update(&post_spec(), &Value::Number(9.into()), &body);
        assert!(q.sql.contains("SET \"published\" = $1::boolean, \"updated_at\" = NOW()"));
        assert!(q.sql.contains("WHERE \"id\" = $2"));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn update_with_empty_body_degrades_to_select() {
        let q = update(&post_spec(), &Value::Number(9.into()), &HashMap::new());
        assert!(q.sql.starts_with("SELECT"));
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn delete_returns_the_row() {
        let q = delete(&post_spec(), &Value::Number(2.into()));
        assert!(q.sql.starts_with("DELETE FROM \"posts\" WHERE \"id\" = $1 RETURNING"));
        assert_eq!(q.params.len(), 1);
    }
}
