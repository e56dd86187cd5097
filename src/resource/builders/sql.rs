//! SQL and graph databases: PostgreSQL, SQL Server, Neo4j
//!
//! None of these kinds has a client-side timeout default: an absent
//! `timeoutMs` means "use the server default".

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Scalar query parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DbParam {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl From<&str> for DbParam {
    fn from(value: &str) -> Self {
        DbParam::String(value.to_string())
    }
}

impl From<String> for DbParam {
    fn from(value: String) -> Self {
        DbParam::String(value)
    }
}

impl From<i64> for DbParam {
    fn from(value: i64) -> Self {
        DbParam::Number(Number::from(value))
    }
}

impl From<bool> for DbParam {
    fn from(value: bool) -> Self {
        DbParam::Bool(value)
    }
}

/// PostgreSQL query with positional (`$1`, `$2`, ...) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostgresPayload {
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<DbParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// SQL Server query with named (`@id`) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MssqlPayload {
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, DbParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Cypher query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neo4jPayload {
    pub cypher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

pub fn build_postgres_invoke_payload(
    sql: impl Into<String>,
    params: Option<Vec<DbParam>>,
    timeout_ms: Option<u64>,
) -> Payload {
    Payload::Postgres(PostgresPayload {
        sql: sql.into(),
        params,
        timeout_ms,
    })
}

pub fn build_mssql_invoke_payload(
    sql: impl Into<String>,
    params: Option<BTreeMap<String, DbParam>>,
    timeout_ms: Option<u64>,
) -> Payload {
    Payload::Mssql(MssqlPayload {
        sql: sql.into(),
        params,
        timeout_ms,
    })
}

pub fn build_neo4j_invoke_payload(
    cypher: impl Into<String>,
    params: Option<Map<String, Value>>,
    timeout_ms: Option<u64>,
) -> Payload {
    Payload::Neo4j(Neo4jPayload {
        cypher: cypher.into(),
        params,
        timeout_ms,
    })
}
