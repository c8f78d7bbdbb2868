//! Declarative admin resources: the managed entities, their columns, and the
//! record actions attached to them.

use crate::admin::actions::{PublishAction, RecordAction};
use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminOp {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl AdminOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AdminOp::List => "list",
            AdminOp::Read => "read",
            AdminOp::Create => "create",
            AdminOp::Update => "update",
            AdminOp::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// PostgreSQL type name, used for SQL casts when binding string values.
    pub pg_type: &'static str,
    pub nullable: bool,
    pub has_default: bool,
    pub primary_key: bool,
}

#[derive(Clone, Debug)]
pub struct ResourceSpec {
    pub name: &'static str,
    pub path_segment: &'static str,
    pub table: &'static str,
    pub pk_column: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub operations: &'static [AdminOp],
}

impl ResourceSpec {
    pub fn allows(&self, op: AdminOp) -> bool {
        self.operations.contains(&op)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A managed resource: the schema plus its custom record actions.
pub struct AdminResource {
    pub spec: ResourceSpec,
    pub actions: Vec<Box<dyn RecordAction>>,
}

impl AdminResource {
    pub fn action(&self, name: &str) -> Option<&dyn RecordAction> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }
}

pub struct AdminRegistry {
    resources: Vec<AdminResource>,
}

impl AdminRegistry {
    pub fn new(resources: Vec<AdminResource>) -> Self {
        Self { resources }
    }

    pub fn by_path(&self, segment: &str) -> Option<&AdminResource> {
        self.resources.iter().find(|r| r.spec.path_segment == segment)
    }

    pub fn resources(&self) -> &[AdminResource] {
        &self.resources
    }
}

/// All columns that are NOT NULL with no default must be present and non-null.
/// The primary key is exempt (serial).
pub fn validate_required(
    spec: &ResourceSpec,
    body: &HashMap<String, Value>,
) -> Result<(), AppError> {
    for col in &spec.columns {
        if col.primary_key || col.nullable || col.has_default {
            continue;
        }
        match body.get(col.name) {
            None | Some(Value::Null) => {
                return Err(AppError::Validation(format!("{} is required", col.name)));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

const ALL_OPS: &[AdminOp] = &[
    AdminOp::List,
    AdminOp::Read,
    AdminOp::Create,
    AdminOp::Update,
    AdminOp::Delete,
];

// Users are never deleted through any exposed operation.
const USER_OPS: &[AdminOp] = &[AdminOp::List, AdminOp::Read, AdminOp::Create, AdminOp::Update];

fn user_resource() -> AdminResource {
    AdminResource {
        spec: ResourceSpec {
            name: "user",
            path_segment: "users",
            table: "users",
            pk_column: "id",
            columns: vec![
                ColumnSpec {
                    name: "id",
                    pg_type: "bigint",
                    nullable: false,
                    has_default: true,
                    primary_key: true,
                },
                ColumnSpec {
                    name: "email",
                    pg_type: "text",
                    nullable: false,
                    has_default: false,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "name",
                    pg_type: "text",
                    nullable: true,
                    has_default: false,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "created_at",
                    pg_type: "timestamptz",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "updated_at",
                    pg_type: "timestamptz",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
            ],
            operations: USER_OPS,
        },
        actions: Vec::new(),
    }
}

fn post_resource() -> AdminResource {
    AdminResource {
        spec: ResourceSpec {
            name: "post",
            path_segment: "posts",
            table: "posts",
            pk_column: "id",
            columns: vec![
                ColumnSpec {
                    name: "id",
                    pg_type: "bigint",
                    nullable: false,
                    has_default: true,
                    primary_key: true,
                },
                ColumnSpec {
                    name: "created_at",
                    pg_type: "timestamptz",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "updated_at",
                    pg_type: "timestamptz",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "title",
                    pg_type: "text",
                    nullable: false,
                    has_default: false,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "content",
                    pg_type: "text",
                    nullable: true,
                    has_default: false,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "published",
                    pg_type: "boolean",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "view_count",
                    pg_type: "integer",
                    nullable: false,
                    has_default: true,
                    primary_key: false,
                },
                ColumnSpec {
                    name: "author_id",
                    pg_type: "bigint",
                    nullable: false,
                    has_default: false,
                    primary_key: false,
                },
            ],
            operations: ALL_OPS,
        },
        actions: vec![Box::new(PublishAction)],
    }
}

/// The blog's managed resources: users (no delete) and posts (full CRUD plus
/// the publish action).
pub fn blog_registry() -> AdminRegistry {
    AdminRegistry::new(vec![user_resource(), post_resource()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_by_path_segment() {
        let registry = blog_registry();
        assert!(registry.by_path("users").is_some());
        assert!(registry.by_path("posts").is_some());
        assert!(registry.by_path("comments").is_none());
    }

    #[test]
    fn users_cannot_be_deleted() {
        let registry = blog_registry();
        let users = registry.by_path("users").unwrap();
        assert!(!users.spec.allows(AdminOp::Delete));
        assert!(users.spec.allows(AdminOp::Update));
    }

    #[test]
    fn post_carries_publish_action() {
        let registry = blog_registry();
        let posts = registry.by_path("posts").unwrap();
        assert!(posts.action("publish").is_some());
        assert!(posts.action("archive").is_none());
        assert!(registry.by_path("users").unwrap().action("publish").is_none());
    }

    #[test]
    fn required_columns_are_enforced() {
        let registry = blog_registry();
        let spec = &registry.by_path("posts").unwrap().spec;

        let mut body = HashMap::new();
        body.insert("title".to_string(), Value::String("Hi".into()));
        // author_id missing
        assert!(validate_required(spec, &body).is_err());

        body.insert("author_id".to_string(), Value::Number(1.into()));
        assert!(validate_required(spec, &body).is_ok());

        body.insert("title".to_string(), Value::Null);
        assert!(validate_required(spec, &body).is_err());
    }
}
