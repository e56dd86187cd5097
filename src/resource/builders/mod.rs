//! Per-kind payload builders
//!
//! Every builder is a pure function from typed arguments to a [`Payload`].
//! Optional arguments left as `None` are omitted from the wire, never sent as
//! `null`. Every kind also accepts a raw, already-shaped body through
//! [`build_raw_invoke_payload`].

pub mod analytics;
pub mod auth;
pub mod bigquery;
pub mod cosmosdb;
pub mod dynamodb;
pub mod http_api;
pub mod lambda;
pub mod s3;
pub mod snowflake;
pub mod sql;

use super::kind::ResourceKind;
use super::payload::{Payload, RawPayload};
use super::registry;
use crate::error::{ResourceError, Result};
use serde_json::{Map, Value};

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Raw pass-through for any kind.
///
/// `type`/`subtype` are always taken from `kind`. Everything else in `body`
/// goes out exactly as given. An `operation` (at the root, or inside an
/// embedded body) must be one the kind declares.
pub fn build_raw_invoke_payload(kind: ResourceKind, body: Value) -> Result<Payload> {
    let fields = match body {
        Value::Object(map) => map,
        other => {
            tracing::warn!(
                "Raw {} payload is {} instead of an object, sending no fields",
                kind,
                json_type(&other)
            );
            Map::new()
        },
    };

    if let Some(declared) = fields.get("subtype").and_then(Value::as_str) {
        if declared != kind.as_str() {
            return Err(ResourceError::KindMismatch {
                expected: kind.as_str().to_string(),
                actual: declared.to_string(),
            });
        }
    }

    let operation = fields
        .get("operation")
        .or_else(|| fields.get(kind.as_str()).and_then(|inner| inner.get("operation")));
    if let Some(operation) = operation {
        let operation = operation
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| operation.to_string());
        if !registry::kind_def(kind).allows_operation(&operation) {
            return Err(ResourceError::UnsupportedOperation {
                subtype: kind.as_str().to_string(),
                operation,
            });
        }
    }

    tracing::debug!("Built raw {} payload with {} fields", kind, fields.len());
    Ok(Payload::Raw(RawPayload { kind, body: fields }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::layout::WireLayout;
    use serde_json::json;

    #[test]
    fn test_raw_stamps_type_and_keeps_fields() {
        let payload = build_raw_invoke_payload(
            ResourceKind::BigQuery,
            json!({ "operation": "getTable", "datasetId": "d", "tableId": "t", "extra": [1, 2] }),
        )
        .unwrap();
        let wire = payload.to_wire(WireLayout::Flat).unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "database",
                "subtype": "bigquery",
                "operation": "getTable",
                "datasetId": "d",
                "tableId": "t",
                "extra": [1, 2]
            })
        );
    }

    #[test]
    fn test_raw_overrides_caller_type() {
        let payload =
            build_raw_invoke_payload(ResourceKind::Postgres, json!({ "type": "api", "sql": "SELECT 1" })).unwrap();
        let wire = payload.to_wire(WireLayout::Flat).unwrap();
        assert_eq!(wire["type"], "database");
    }

    #[test]
    fn test_raw_rejects_unknown_operation() {
        let err = build_raw_invoke_payload(ResourceKind::CosmosDb, json!({ "operation": "truncate" })).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::UnsupportedOperation { ref operation, .. } if operation == "truncate"
        ));
    }

    #[test]
    fn test_raw_checks_embedded_operation() {
        let err = build_raw_invoke_payload(
            ResourceKind::Snowflake,
            json!({ "snowflake": { "operation": "drop" } }),
        )
        .unwrap_err();
        assert!(matches!(err, ResourceError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_raw_rejects_operation_on_single_operation_kind() {
        let err = build_raw_invoke_payload(ResourceKind::Lambda, json!({ "operation": "invoke" })).unwrap_err();
        assert!(matches!(err, ResourceError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_raw_rejects_foreign_subtype() {
        let err = build_raw_invoke_payload(ResourceKind::Mssql, json!({ "subtype": "postgresql" })).unwrap_err();
        assert!(matches!(err, ResourceError::KindMismatch { .. }));
    }

    #[test]
    fn test_raw_non_object_becomes_empty() {
        let payload = build_raw_invoke_payload(ResourceKind::Snowflake, Value::Null).unwrap();
        let wire = payload.to_wire(WireLayout::Embedded).unwrap();
        assert_eq!(wire, json!({ "type": "database", "subtype": "snowflake" }));
    }
}
