//! BigQuery operations

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigQueryFieldSchema {
    pub name: String,
    /// STRING, INTEGER, FLOAT, BOOLEAN, TIMESTAMP, RECORD, ...
    #[serde(rename = "type")]
    pub field_type: String,
    /// NULLABLE, REQUIRED or REPEATED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested fields of a RECORD column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<BigQueryFieldSchema>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigQueryTableSchema {
    pub fields: Vec<BigQueryFieldSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BigQueryQueryOptions {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_results: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BigQueryOperation {
    Query {
        sql: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Map<String, Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_results: Option<u64>,
    },
    ListDatasets {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_results: Option<u64>,
    },
    ListTables {
        dataset_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_results: Option<u64>,
    },
    GetTable {
        dataset_id: String,
        table_id: String,
    },
    InsertRows {
        dataset_id: String,
        table_id: String,
        rows: Vec<Map<String, Value>>,
    },
    CreateTable {
        dataset_id: String,
        table_id: String,
        schema: BigQueryTableSchema,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
}

impl BigQueryOperation {
    pub fn name(&self) -> &'static str {
        match self {
            BigQueryOperation::Query { .. } => "query",
            BigQueryOperation::ListDatasets { .. } => "listDatasets",
            BigQueryOperation::ListTables { .. } => "listTables",
            BigQueryOperation::GetTable { .. } => "getTable",
            BigQueryOperation::InsertRows { .. } => "insertRows",
            BigQueryOperation::CreateTable { .. } => "createTable",
        }
    }
}

pub fn build_bigquery_invoke_payload(operation: BigQueryOperation) -> Payload {
    Payload::BigQuery(operation)
}

pub fn build_bigquery_query_payload(
    sql: impl Into<String>,
    params: Option<Map<String, Value>>,
    options: BigQueryQueryOptions,
) -> Payload {
    Payload::BigQuery(BigQueryOperation::Query {
        sql: sql.into(),
        params,
        timeout_ms: options.timeout_ms,
        max_results: options.max_results,
    })
}

pub fn build_bigquery_list_datasets_payload(max_results: Option<u64>) -> Payload {
    Payload::BigQuery(BigQueryOperation::ListDatasets { max_results })
}

pub fn build_bigquery_list_tables_payload(dataset_id: impl Into<String>, max_results: Option<u64>) -> Payload {
    Payload::BigQuery(BigQueryOperation::ListTables {
        dataset_id: dataset_id.into(),
        max_results,
    })
}

pub fn build_bigquery_get_table_payload(dataset_id: impl Into<String>, table_id: impl Into<String>) -> Payload {
    Payload::BigQuery(BigQueryOperation::GetTable {
        dataset_id: dataset_id.into(),
        table_id: table_id.into(),
    })
}

pub fn build_bigquery_insert_rows_payload(
    dataset_id: impl Into<String>,
    table_id: impl Into<String>,
    rows: Vec<Map<String, Value>>,
) -> Payload {
    Payload::BigQuery(BigQueryOperation::InsertRows {
        dataset_id: dataset_id.into(),
        table_id: table_id.into(),
        rows,
    })
}

pub fn build_bigquery_create_table_payload(
    dataset_id: impl Into<String>,
    table_id: impl Into<String>,
    schema: BigQueryTableSchema,
    timeout_ms: Option<u64>,
) -> Payload {
    Payload::BigQuery(BigQueryOperation::CreateTable {
        dataset_id: dataset_id.into(),
        table_id: table_id.into(),
        schema,
        timeout_ms,
    })
}
