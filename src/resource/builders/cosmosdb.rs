//! Azure Cosmos DB
//!
//! Each operation has its own field set; the operation enum keeps them apart
//! so a `read` can never carry a `patchOperations` list.
//!
//! `partitionKey` is optional everywhere. On a partitioned container an absent
//! key makes the server fan out across partitions; the builders never fill it in.

use super::sql::DbParam;
use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single value or hierarchical (multi-level) partition key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartitionKey {
    Single(DbParam),
    Hierarchical(Vec<DbParam>),
}

impl From<DbParam> for PartitionKey {
    fn from(value: DbParam) -> Self {
        PartitionKey::Single(value)
    }
}

impl From<&str> for PartitionKey {
    fn from(value: &str) -> Self {
        PartitionKey::Single(DbParam::from(value))
    }
}

impl From<i64> for PartitionKey {
    fn from(value: i64) -> Self {
        PartitionKey::Single(DbParam::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosQueryParameter {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Set,
    Replace,
    Remove,
    Incr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosPatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosQueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<CosmosQueryParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<PartitionKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_item_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Options shared by the single-document operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosItemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<PartitionKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosPatchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<PartitionKey>,
    /// SQL-like filter predicate the document must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosQuery {
    pub container: String,
    pub query: String,
    #[serde(flatten)]
    pub options: CosmosQueryOptions,
}

/// read / delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosItem {
    pub container: String,
    pub id: String,
    #[serde(flatten)]
    pub options: CosmosItemOptions,
}

/// create / upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosWrite {
    pub container: String,
    pub body: Map<String, Value>,
    #[serde(flatten)]
    pub options: CosmosItemOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosReplace {
    pub container: String,
    pub id: String,
    pub body: Map<String, Value>,
    #[serde(flatten)]
    pub options: CosmosItemOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosPatch {
    pub container: String,
    pub id: String,
    pub patch_operations: Vec<CosmosPatchOperation>,
    #[serde(flatten)]
    pub options: CosmosPatchOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum CosmosDbOperation {
    Query(CosmosQuery),
    Read(CosmosItem),
    Create(CosmosWrite),
    Replace(CosmosReplace),
    Upsert(CosmosWrite),
    Delete(CosmosItem),
    Patch(CosmosPatch),
}

impl CosmosDbOperation {
    pub fn name(&self) -> &'static str {
        match self {
            CosmosDbOperation::Query(_) => "query",
            CosmosDbOperation::Read(_) => "read",
            CosmosDbOperation::Create(_) => "create",
            CosmosDbOperation::Replace(_) => "replace",
            CosmosDbOperation::Upsert(_) => "upsert",
            CosmosDbOperation::Delete(_) => "delete",
            CosmosDbOperation::Patch(_) => "patch",
        }
    }
}

/// Typed pass-through of an already complete operation
pub fn build_cosmosdb_invoke_payload(operation: CosmosDbOperation) -> Payload {
    Payload::CosmosDb(operation)
}

pub fn build_cosmosdb_query_payload(
    container: impl Into<String>,
    query: impl Into<String>,
    options: CosmosQueryOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Query(CosmosQuery {
        container: container.into(),
        query: query.into(),
        options,
    }))
}

pub fn build_cosmosdb_read_payload(
    container: impl Into<String>,
    id: impl Into<String>,
    options: CosmosItemOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Read(CosmosItem {
        container: container.into(),
        id: id.into(),
        options,
    }))
}

pub fn build_cosmosdb_create_payload(
    container: impl Into<String>,
    body: Map<String, Value>,
    options: CosmosItemOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Create(CosmosWrite {
        container: container.into(),
        body,
        options,
    }))
}

pub fn build_cosmosdb_replace_payload(
    container: impl Into<String>,
    id: impl Into<String>,
    body: Map<String, Value>,
    options: CosmosItemOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Replace(CosmosReplace {
        container: container.into(),
        id: id.into(),
        body,
        options,
    }))
}

pub fn build_cosmosdb_upsert_payload(
    container: impl Into<String>,
    body: Map<String, Value>,
    options: CosmosItemOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Upsert(CosmosWrite {
        container: container.into(),
        body,
        options,
    }))
}

pub fn build_cosmosdb_delete_payload(
    container: impl Into<String>,
    id: impl Into<String>,
    options: CosmosItemOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Delete(CosmosItem {
        container: container.into(),
        id: id.into(),
        options,
    }))
}

pub fn build_cosmosdb_patch_payload(
    container: impl Into<String>,
    id: impl Into<String>,
    patch_operations: Vec<CosmosPatchOperation>,
    options: CosmosPatchOptions,
) -> Payload {
    Payload::CosmosDb(CosmosDbOperation::Patch(CosmosPatch {
        container: container.into(),
        id: id.into(),
        patch_operations,
        options,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::layout::WireLayout;
    use serde_json::json;

    #[test]
    fn test_query_without_partition_key_omits_it() {
        let wire = build_cosmosdb_query_payload("orders", "SELECT * FROM c", CosmosQueryOptions::default())
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "database",
                "subtype": "cosmosdb",
                "operation": "query",
                "container": "orders",
                "query": "SELECT * FROM c"
            })
        );
    }

    #[test]
    fn test_read_with_hierarchical_partition_key() {
        let options = CosmosItemOptions {
            partition_key: Some(PartitionKey::Hierarchical(vec!["tenant-a".into(), DbParam::from(2024_i64)])),
            timeout_ms: Some(2000),
        };
        let wire = build_cosmosdb_read_payload("orders", "o-1", options)
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(wire["operation"], "read");
        assert_eq!(wire["partitionKey"], json!(["tenant-a", 2024]));
        assert_eq!(wire["timeoutMs"], 2000);
    }

    #[test]
    fn test_patch_payload_fields() {
        let ops = vec![
            CosmosPatchOperation {
                op: PatchOp::Incr,
                path: "/count".to_string(),
                value: Some(json!(1)),
            },
            CosmosPatchOperation {
                op: PatchOp::Remove,
                path: "/stale".to_string(),
                value: None,
            },
        ];
        let options = CosmosPatchOptions {
            partition_key: Some("p1".into()),
            condition: Some("from c where c.active = true".to_string()),
            timeout_ms: None,
        };
        let wire = build_cosmosdb_patch_payload("orders", "o-1", ops, options)
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            wire["patchOperations"],
            json!([{ "op": "incr", "path": "/count", "value": 1 }, { "op": "remove", "path": "/stale" }])
        );
        assert_eq!(wire["condition"], "from c where c.active = true");
        assert!(wire.get("timeoutMs").is_none());
    }

    #[test]
    fn test_operation_decodes_from_tag() {
        let op: CosmosDbOperation = serde_json::from_value(json!({
            "operation": "delete",
            "container": "orders",
            "id": "o-9",
            "partitionKey": "p"
        }))
        .unwrap();
        assert_eq!(op.name(), "delete");
        let CosmosDbOperation::Delete(item) = op else {
            panic!("expected delete");
        };
        assert_eq!(item.options.partition_key, Some(PartitionKey::from("p")));
    }

    #[test]
    fn test_upsert_and_create_share_shape() {
        let mut body = Map::new();
        body.insert("id".to_string(), json!("o-2"));
        let create = build_cosmosdb_create_payload("orders", body.clone(), CosmosItemOptions::default());
        let upsert = build_cosmosdb_upsert_payload("orders", body, CosmosItemOptions::default());
        assert_eq!(create.operation(), Some("create"));
        assert_eq!(upsert.operation(), Some("upsert"));
    }
}
