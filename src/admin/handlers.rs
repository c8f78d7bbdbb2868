//! Admin CRUD handlers, resolved against the resource registry.

use crate::admin::crud::CrudService;
use crate::admin::resource::{
    validate_required, AdminOp, AdminRegistry, AdminResource, ResourceSpec,
};
use crate::error::AppError;
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub pool: PgPool,
    pub registry: Arc<AdminRegistry>,
}

impl AdminState {
    pub fn new(state: AppState, registry: AdminRegistry) -> Self {
        Self {
            pool: state.pool,
            registry: Arc::new(registry),
        }
    }
}

fn resource<'a>(registry: &'a AdminRegistry, segment: &str) -> Result<&'a AdminResource, AppError> {
    registry
        .by_path(segment)
        .ok_or_else(|| AppError::NotFound(format!("no such resource: {}", segment)))
}

fn require_op(spec: &ResourceSpec, op: AdminOp) -> Result<(), AppError> {
    if !spec.allows(op) {
        return Err(AppError::BadRequest(format!(
            "{} not allowed on {}",
            op.as_str(),
            spec.name
        )));
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<Value, AppError> {
    let n: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))?;
    Ok(Value::Number(n.into()))
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Coerce a raw query-string value by the column's declared type, so
/// `?published=true` and `?author_id=3` filter as bool and int, not text.
fn query_value_for_column(spec: &ResourceSpec, col: &str, s: &str) -> Value {
    let pg_type = spec.column(col).map(|c| c.pg_type).unwrap_or("text");
    if pg_type.contains("int") {
        if let Ok(n) = s.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if pg_type.starts_with("bool") {
        if s.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
    }
    Value::String(s.to_string())
}

fn describe(resource: &AdminResource) -> Value {
    let spec = &resource.spec;
    serde_json::json!({
        "name": spec.name,
        "path": spec.path_segment,
        "primaryKey": spec.pk_column,
        "columns": spec.columns.iter().map(|c| serde_json::json!({
            "name": c.name,
            "type": c.pg_type,
            "nullable": c.nullable,
            "hasDefault": c.has_default,
            "primaryKey": c.primary_key,
        })).collect::<Vec<_>>(),
        "operations": spec.operations.iter().map(|o| o.as_str()).collect::<Vec<_>>(),
        "actions": resource.actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
    })
}

/// Resource descriptors: everything a generic admin front end needs to render
/// listings, forms, and action buttons.
pub async fn describe_resources(
    State(state): State<AdminState>,
) -> impl axum::response::IntoResponse {
    let descriptors: Vec<Value> = state.registry.resources().iter().map(describe).collect();
    response::success_many(descriptors)
}

pub async fn list(
    State(state): State<AdminState>,
    Path(segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    require_op(&resource.spec, AdminOp::List)?;

    let mut limit: Option<u32> = None;
    let mut offset: Option<u32> = None;
    let mut filters: Vec<(String, Value)> = Vec::new();
    for (k, v) in params {
        match k.as_str() {
            "limit" => limit = v.parse().ok(),
            "offset" => offset = v.parse().ok(),
            _ => {
                if resource.spec.column(&k).is_some() {
                    let val = query_value_for_column(&resource.spec, &k, &v);
                    filters.push((k, val));
                }
            }
        }
    }

    let rows = CrudService::list(&state.pool, &resource.spec, &filters, limit, offset).await?;
    Ok(response::success_many(rows))
}

pub async fn create(
    State(state): State<AdminState>,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    require_op(&resource.spec, AdminOp::Create)?;
    let body = body_to_map(body)?;
    validate_required(&resource.spec, &body)?;
    let row = CrudService::create(&state.pool, &resource.spec, &body).await?;
    Ok(response::success_one(row))
}

pub async fn read(
    State(state): State<AdminState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    require_op(&resource.spec, AdminOp::Read)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&state.pool, &resource.spec, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    Ok(response::success_one_ok(row))
}

pub async fn update(
    State(state): State<AdminState>,
    Path((segment, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    require_op(&resource.spec, AdminOp::Update)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let row = CrudService::update(&state.pool, &resource.spec, &id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    Ok(response::success_one_ok(row))
}

pub async fn delete_record(
    State(state): State<AdminState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    require_op(&resource.spec, AdminOp::Delete)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::delete(&state.pool, &resource.spec, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    Ok(response::success_one_ok(row))
}

pub async fn run_action(
    State(state): State<AdminState>,
    Path((segment, id_str, action_name)): Path<(String, String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let resource = resource(&state.registry, &segment)?;
    let action = resource.action(&action_name).ok_or_else(|| {
        AppError::NotFound(format!(
            "no action {} on resource {}",
            action_name, resource.spec.name
        ))
    })?;
    let id = parse_id(&id_str)?;
    let outcome = action.run(&state.pool, &resource.spec, &id).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::resource::blog_registry;

    #[test]
    fn id_parsing_is_strict() {
        assert!(parse_id("12").is_ok());
        assert!(parse_id("twelve").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn query_values_coerce_by_column_type() {
        let registry = blog_registry();
        let spec = &registry.by_path("posts").unwrap().spec;
        assert_eq!(query_value_for_column(spec, "author_id", "3"), Value::Number(3.into()));
        assert_eq!(query_value_for_column(spec, "published", "TRUE"), Value::Bool(true));
        assert_eq!(
            query_value_for_column(spec, "title", "Hi"),
            Value::String("Hi".into())
        );
        // unparseable int falls back to the raw string
        assert_eq!(
            query_value_for_column(spec, "author_id", "x"),
            Value::String("x".into())
        );
    }

    #[test]
    fn descriptor_lists_publish_action() {
        let registry = blog_registry();
        let posts = registry.by_path("posts").unwrap();
        let desc = describe(posts);
        assert_eq!(desc["name"], "post");
        assert_eq!(desc["actions"][0], "publish");
        assert!(desc["operations"]
            .as_array()
            .unwrap()
            .iter()
            .any(|o| o == "delete"));
    }
}
