//! Custom record actions attached to admin resources.

use crate::admin::crud::CrudService;
use crate::admin::resource::ResourceSpec;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

/// A named operation on a single record, invoked via
/// `POST /{resource}/{id}/actions/{name}`.
#[async_trait]
pub trait RecordAction: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(
        &self,
        pool: &PgPool,
        spec: &ResourceSpec,
        id: &Value,
    ) -> Result<ActionOutcome, AppError>;
}

#[derive(Serialize)]
pub struct Notice {
    pub message: String,
}

#[derive(Serialize)]
pub struct ActionOutcome {
    pub notice: Notice,
    pub record: Value,
}

pub const PUBLISH_NOTICE: &str = "公開されました🚀";

/// Marks a record as published. Setting an already-true flag again is a no-op,
/// so repeated invocations are safe.
pub struct PublishAction;

#[async_trait]
impl RecordAction for PublishAction {
    fn name(&self) -> &'static str {
        "publish"
    }

    async fn run(
        &self,
        pool: &PgPool,
        spec: &ResourceSpec,
        id: &Value,
    ) -> Result<ActionOutcome, AppError> {
        let mut body = HashMap::new();
        body.insert("published".to_string(), Value::Bool(true));
        let record = CrudService::update(pool, spec, id, &body)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("record {} does not exist", id)))?;
        Ok(ActionOutcome {
            notice: Notice {
                message: PUBLISH_NOTICE.to_string(),
            },
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_notice_and_record() {
        let outcome = ActionOutcome {
            notice: Notice {
                message: PUBLISH_NOTICE.to_string(),
            },
            record: serde_json::json!({"id": 1, "published": true}),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["notice"]["message"], PUBLISH_NOTICE);
        assert_eq!(json["record"]["published"], true);
    }
}
