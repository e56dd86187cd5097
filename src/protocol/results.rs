//! Per-kind success results
//!
//! Every result object carries a `kind` tag. Tags this client does not know,
//! and known tags whose fields do not match the typed struct, decode as
//! [`ResourceResult::Other`] with the fields untouched.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type Row = Map<String, Value>;

/// SQL row set (PostgreSQL, SQL Server)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbResult {
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

/// AWS SDK command output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamoDbResult {
    pub command: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum CosmosDbResult {
    Query {
        #[serde(default)]
        documents: Vec<Row>,
        #[serde(default)]
        count: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        continuation_token: Option<String>,
    },
    Read {
        document: Row,
        #[serde(default)]
        etag: String,
    },
    Create {
        document: Row,
    },
    Replace {
        document: Row,
    },
    Upsert {
        document: Row,
    },
    Delete,
    Patch {
        document: Row,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakePartitionInfo {
    pub row_count: u64,
    pub uncompressed_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeResultSetMetadata {
    pub num_rows: u64,
    pub format: String,
    #[serde(default)]
    pub row_type: Vec<SnowflakeColumnMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_info: Option<Vec<SnowflakePartitionInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows_inserted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows_updated: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows_deleted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_duplicate_rows_updated: Option<u64>,
}

/// Snowflake SQL API response, passed through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_handles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_status_url: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_set_meta_data: Option<SnowflakeResultSetMetadata>,
    /// Rows as arrays of nullable strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<Option<String>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<SnowflakeStats>,
}

/// S3 result: a presigned URL or the raw command output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageResult {
    #[serde(rename_all = "camelCase")]
    Presigned { presigned_url: String, expires_at: String },
    Standard {
        command: String,
        #[serde(default)]
        data: Value,
    },
}

impl StorageResult {
    /// Expiry of a presigned URL, `None` for other results or an unparseable timestamp
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            StorageResult::Presigned { expires_at, .. } => DateTime::parse_from_rfc3339(expires_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| tracing::debug!("Unparseable presigned URL expiry {}: {}", expires_at, e))
                .ok(),
            StorageResult::Standard { .. } => None,
        }
    }
}

/// HTTP-shaped API response (custom, HubSpot, Salesforce, Google Sheets, Slack, GraphQL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Neo4jResult {
    #[serde(default)]
    pub records: Vec<Row>,
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaResult {
    /// 200 sync, 202 async, 204 dry run
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// "Handled" or "Unhandled"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_error: Option<String>,
    /// Base64 tail of the execution log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable_execution_arn: Option<String>,
}

/// Result of a multi-operation kind whose data shape depends on the operation
/// (BigQuery, Google Analytics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachResult {
    pub status_code: u16,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResult {
    Database(DbResult),
    DynamoDb(DynamoDbResult),
    CosmosDb(CosmosDbResult),
    Snowflake(SnowflakeResult),
    Storage(StorageResult),
    Api(ApiResult),
    Neo4j(Neo4jResult),
    Lambda(LambdaResult),
    BigQuery(OperationResult),
    GoogleAnalytics(OperationResult),
    Outreach(OutreachResult),
    Auth(AuthResult),
    /// A kind this client does not model, or a known kind in an unexpected shape
    Other { kind: String, fields: Map<String, Value> },
}

impl ResourceResult {
    /// The `kind` tag
    pub fn kind(&self) -> &str {
        match self {
            ResourceResult::Database(_) => "database",
            ResourceResult::DynamoDb(_) => "dynamodb",
            ResourceResult::CosmosDb(_) => "cosmosdb",
            ResourceResult::Snowflake(_) => "snowflake",
            ResourceResult::Storage(_) => "storage",
            ResourceResult::Api(_) => "api",
            ResourceResult::Neo4j(_) => "neo4j",
            ResourceResult::Lambda(_) => "lambda",
            ResourceResult::BigQuery(_) => "bigquery",
            ResourceResult::GoogleAnalytics(_) => "googleanalytics",
            ResourceResult::Outreach(_) => "outreach",
            ResourceResult::Auth(_) => "auth",
            ResourceResult::Other { kind, .. } => kind,
        }
    }

    fn body(&self) -> serde_json::Result<Value> {
        match self {
            ResourceResult::Database(r) => serde_json::to_value(r),
            ResourceResult::DynamoDb(r) => serde_json::to_value(r),
            ResourceResult::CosmosDb(r) => serde_json::to_value(r),
            ResourceResult::Snowflake(r) => serde_json::to_value(r),
            ResourceResult::Storage(r) => serde_json::to_value(r),
            ResourceResult::Api(r) => serde_json::to_value(r),
            ResourceResult::Neo4j(r) => serde_json::to_value(r),
            ResourceResult::Lambda(r) => serde_json::to_value(r),
            ResourceResult::BigQuery(r) | ResourceResult::GoogleAnalytics(r) => serde_json::to_value(r),
            ResourceResult::Outreach(r) => serde_json::to_value(r),
            ResourceResult::Auth(r) => serde_json::to_value(r),
            ResourceResult::Other { fields, .. } => Ok(Value::Object(fields.clone())),
        }
    }
}

impl Serialize for ResourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = Map::new();
        out.insert("kind".to_string(), Value::String(self.kind().to_string()));
        match self.body().map_err(S::Error::custom)? {
            Value::Object(fields) => out.extend(fields),
            other => return Err(S::Error::custom(format!("result body is not an object: {}", other))),
        }
        Value::Object(out).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
        let kind = match fields.remove("kind") {
            Some(Value::String(kind)) => kind,
            Some(other) => return Err(D::Error::custom(format!("result kind must be a string, got {}", other))),
            None => return Err(D::Error::missing_field("kind")),
        };

        fn typed<T: serde::de::DeserializeOwned>(fields: &Map<String, Value>) -> serde_json::Result<T> {
            serde_json::from_value(Value::Object(fields.clone()))
        }

        let result = match kind.as_str() {
            "database" => typed(&fields).map(ResourceResult::Database),
            "dynamodb" => typed(&fields).map(ResourceResult::DynamoDb),
            "cosmosdb" => typed(&fields).map(ResourceResult::CosmosDb),
            "snowflake" => typed(&fields).map(ResourceResult::Snowflake),
            "storage" => typed(&fields).map(ResourceResult::Storage),
            "api" => typed(&fields).map(ResourceResult::Api),
            "neo4j" => typed(&fields).map(ResourceResult::Neo4j),
            "lambda" => typed(&fields).map(ResourceResult::Lambda),
            "bigquery" => typed(&fields).map(ResourceResult::BigQuery),
            "googleanalytics" => typed(&fields).map(ResourceResult::GoogleAnalytics),
            "outreach" => typed(&fields).map(ResourceResult::Outreach),
            "auth" => typed(&fields).map(ResourceResult::Auth),
            _ => return Ok(ResourceResult::Other { kind, fields }),
        };

        // A known kind whose fields do not fit its struct stays untyped
        Ok(result.unwrap_or_else(|e| {
            tracing::debug!("Keeping {} result untyped: {}", kind, e);
            ResourceResult::Other { kind, fields }
        }))
    }
}
