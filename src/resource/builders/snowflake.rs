//! Snowflake SQL API operations
//!
//! Unlike the other database kinds, `timeout` here is in **seconds**
//! (0 means the server maximum of 7 days).

use super::sql::DbParam;
use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnowflakeBindingType {
    Text,
    Fixed,
    Real,
    Boolean,
    Date,
    Time,
    TimestampLtz,
    TimestampNtz,
    TimestampTz,
    Binary,
    Array,
    Object,
    Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowflakeBinding {
    #[serde(rename = "type")]
    pub binding_type: SnowflakeBindingType,
    pub value: DbParam,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeExecuteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BTreeMap<String, SnowflakeBinding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Return a statement handle immediately instead of waiting for rows
    #[serde(default, rename = "async", skip_serializing_if = "Option::is_none")]
    pub run_async: Option<bool>,
    /// Session parameters (`query_tag`, `timezone`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Idempotency key; the server generates one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowflakeExecute {
    pub statement: String,
    #[serde(flatten)]
    pub options: SnowflakeExecuteOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeStatus {
    pub statement_handle: String,
    /// Result partition to fetch (0-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeCancel {
    pub statement_handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum SnowflakeOperation {
    Execute(SnowflakeExecute),
    Status(SnowflakeStatus),
    Cancel(SnowflakeCancel),
}

impl SnowflakeOperation {
    pub fn name(&self) -> &'static str {
        match self {
            SnowflakeOperation::Execute(_) => "execute",
            SnowflakeOperation::Status(_) => "status",
            SnowflakeOperation::Cancel(_) => "cancel",
        }
    }
}

pub fn build_snowflake_invoke_payload(operation: SnowflakeOperation) -> Payload {
    Payload::Snowflake(operation)
}

pub fn build_snowflake_execute_payload(statement: impl Into<String>, options: SnowflakeExecuteOptions) -> Payload {
    Payload::Snowflake(SnowflakeOperation::Execute(SnowflakeExecute {
        statement: statement.into(),
        options,
    }))
}

pub fn build_snowflake_status_payload(statement_handle: impl Into<String>, partition: Option<u64>) -> Payload {
    Payload::Snowflake(SnowflakeOperation::Status(SnowflakeStatus {
        statement_handle: statement_handle.into(),
        partition,
    }))
}

pub fn build_snowflake_cancel_payload(statement_handle: impl Into<String>) -> Payload {
    Payload::Snowflake(SnowflakeOperation::Cancel(SnowflakeCancel {
        statement_handle: statement_handle.into(),
    }))
}
