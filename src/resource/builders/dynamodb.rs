//! DynamoDB
//!
//! Command inputs follow the AWS SDK input shapes and are passed through as JSON.

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamoDbCommand {
    GetItem,
    PutItem,
    UpdateItem,
    DeleteItem,
    Query,
    Scan,
    BatchGetItem,
    BatchWriteItem,
    TransactGetItems,
    TransactWriteItems,
    ListTables,
    DescribeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamoDbPayload {
    pub command: DynamoDbCommand,
    /// AWS SDK command input (e.g. `{ "TableName": "users", "Key": {...} }`)
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

pub fn build_dynamodb_invoke_payload(command: DynamoDbCommand, params: Value) -> Payload {
    Payload::DynamoDb(DynamoDbPayload { command, params })
}
