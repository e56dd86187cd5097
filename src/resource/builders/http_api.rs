//! HTTP-shaped API kinds: custom REST, HubSpot, Salesforce, Google Sheets,
//! Outreach, Slack, GraphQL
//!
//! All of them get the registry's default timeout (30s) when the caller gives none.

use crate::resource::kind::ResourceKind;
use crate::resource::payload::Payload;
use crate::resource::registry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

const SALESFORCE_API_BASE: &str = "/services/data/v63.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A query parameter value: one string or a repeated parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::Many(value)
    }
}

pub type QueryParams = BTreeMap<String, QueryValue>;

/// Request body of an HTTP-shaped API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BodyPayload {
    Json {
        value: Value,
    },
    Text {
        value: String,
    },
    Bytes {
        base64: String,
        #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
}

/// JSON-only request body, `{ "type": "json", "value": ... }` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BodyPayload", try_from = "BodyPayload")]
pub struct JsonBody(pub Value);

impl From<JsonBody> for BodyPayload {
    fn from(body: JsonBody) -> Self {
        BodyPayload::Json { value: body.0 }
    }
}

impl TryFrom<BodyPayload> for JsonBody {
    type Error = String;

    fn try_from(body: BodyPayload) -> Result<Self, Self::Error> {
        match body {
            BodyPayload::Json { value } => Ok(JsonBody(value)),
            BodyPayload::Text { .. } => Err("expected a json body, got text".to_string()),
            BodyPayload::Bytes { .. } => Err("expected a json body, got bytes".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomApiOptions {
    #[serde(default)]
    pub query: Option<QueryParams>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<BodyPayload>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomApiPayload {
    pub method: HttpMethod,
    /// Appended to the resource's base URL
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiOptions {
    #[serde(default)]
    pub query: Option<QueryParams>,
    #[serde(default)]
    pub body: Option<JsonBody>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Vendor API call (HubSpot, Salesforce, Google Sheets); auth is added server-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiPayload {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachOptions {
    #[serde(default)]
    pub query_params: Option<QueryParams>,
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachPayload {
    pub method: HttpMethod,
    /// e.g. `/api/v2/prospects`
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<QueryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackOptions {
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackPayload {
    /// Web API method, e.g. `chat.postMessage`
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlOptions {
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlPayload {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// How Google Sheets interprets written values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    Raw,
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub range: String,
    pub values: Vec<Vec<Value>>,
}

fn timeout_or_default(kind: ResourceKind, timeout_ms: Option<u64>) -> Option<u64> {
    timeout_ms.or_else(|| registry::default_timeout_ms(kind))
}

fn http_api(kind: ResourceKind, method: HttpMethod, path: String, options: HttpApiOptions) -> HttpApiPayload {
    HttpApiPayload {
        method,
        path,
        query: options.query,
        body: options.body,
        timeout_ms: timeout_or_default(kind, options.timeout_ms),
    }
}

// ============================================================================
// Custom REST
// ============================================================================

pub fn build_custom_api_invoke_payload(method: HttpMethod, path: impl Into<String>, options: CustomApiOptions) -> Payload {
    Payload::Custom(CustomApiPayload {
        method,
        path: path.into(),
        query: options.query,
        headers: options.headers,
        body: options.body,
        timeout_ms: timeout_or_default(ResourceKind::Custom, options.timeout_ms),
    })
}

// ============================================================================
// HubSpot
// ============================================================================

pub fn build_hubspot_invoke_payload(method: HttpMethod, path: impl Into<String>, options: HttpApiOptions) -> Payload {
    Payload::HubSpot(http_api(ResourceKind::HubSpot, method, path.into(), options))
}

// ============================================================================
// Salesforce (REST API v63.0)
// ============================================================================

pub fn build_salesforce_invoke_payload(method: HttpMethod, path: impl Into<String>, options: HttpApiOptions) -> Payload {
    Payload::Salesforce(http_api(ResourceKind::Salesforce, method, path.into(), options))
}

/// SOQL query
pub fn build_salesforce_query_payload(soql: impl Into<String>) -> Payload {
    let mut query = QueryParams::new();
    query.insert("q".to_string(), QueryValue::Many(vec![soql.into()]));
    build_salesforce_invoke_payload(
        HttpMethod::Get,
        format!("{}/query", SALESFORCE_API_BASE),
        HttpApiOptions {
            query: Some(query),
            ..Default::default()
        },
    )
}

/// Fetch one record, optionally limited to `fields`
pub fn build_salesforce_get_record_payload(object_type: &str, record_id: &str, fields: &[String]) -> Payload {
    let query = if fields.is_empty() {
        None
    } else {
        let mut query = QueryParams::new();
        query.insert("fields".to_string(), QueryValue::Many(vec![fields.join(",")]));
        Some(query)
    };
    build_salesforce_invoke_payload(
        HttpMethod::Get,
        format!("{}/sobjects/{}/{}", SALESFORCE_API_BASE, object_type, record_id),
        HttpApiOptions {
            query,
            ..Default::default()
        },
    )
}

pub fn build_salesforce_create_record_payload(object_type: &str, data: Map<String, Value>) -> Payload {
    build_salesforce_invoke_payload(
        HttpMethod::Post,
        format!("{}/sobjects/{}", SALESFORCE_API_BASE, object_type),
        HttpApiOptions {
            body: Some(JsonBody(Value::Object(data))),
            ..Default::default()
        },
    )
}

pub fn build_salesforce_update_record_payload(object_type: &str, record_id: &str, data: Map<String, Value>) -> Payload {
    build_salesforce_invoke_payload(
        HttpMethod::Patch,
        format!("{}/sobjects/{}/{}", SALESFORCE_API_BASE, object_type, record_id),
        HttpApiOptions {
            body: Some(JsonBody(Value::Object(data))),
            ..Default::default()
        },
    )
}

pub fn build_salesforce_delete_record_payload(object_type: &str, record_id: &str) -> Payload {
    build_salesforce_invoke_payload(
        HttpMethod::Delete,
        format!("{}/sobjects/{}/{}", SALESFORCE_API_BASE, object_type, record_id),
        HttpApiOptions::default(),
    )
}

pub fn build_salesforce_describe_object_payload(object_type: &str) -> Payload {
    build_salesforce_invoke_payload(
        HttpMethod::Get,
        format!("{}/sobjects/{}/describe", SALESFORCE_API_BASE, object_type),
        HttpApiOptions::default(),
    )
}

// ============================================================================
// Google Sheets (paths relative to the bound spreadsheet)
// ============================================================================

pub fn build_googlesheets_invoke_payload(method: HttpMethod, path: impl Into<String>, options: HttpApiOptions) -> Payload {
    Payload::GoogleSheets(http_api(ResourceKind::GoogleSheets, method, path.into(), options))
}

fn value_input_query(option: ValueInputOption) -> QueryParams {
    let mut query = QueryParams::new();
    query.insert("valueInputOption".to_string(), QueryValue::from(option.as_str()));
    query
}

pub fn build_googlesheets_get_values_payload(range: &str) -> Payload {
    build_googlesheets_invoke_payload(HttpMethod::Get, format!("/values/{}", range), HttpApiOptions::default())
}

pub fn build_googlesheets_update_values_payload(
    range: &str,
    values: Vec<Vec<Value>>,
    value_input_option: ValueInputOption,
) -> Payload {
    build_googlesheets_invoke_payload(
        HttpMethod::Put,
        format!("/values/{}", range),
        HttpApiOptions {
            query: Some(value_input_query(value_input_option)),
            body: Some(JsonBody(json!({ "values": values }))),
            timeout_ms: None,
        },
    )
}

pub fn build_googlesheets_append_values_payload(
    range: &str,
    values: Vec<Vec<Value>>,
    value_input_option: ValueInputOption,
) -> Payload {
    build_googlesheets_invoke_payload(
        HttpMethod::Post,
        format!("/values/{}:append", range),
        HttpApiOptions {
            query: Some(value_input_query(value_input_option)),
            body: Some(JsonBody(json!({ "values": values }))),
            timeout_ms: None,
        },
    )
}

pub fn build_googlesheets_clear_values_payload(range: &str) -> Payload {
    build_googlesheets_invoke_payload(HttpMethod::Post, format!("/values/{}:clear", range), HttpApiOptions::default())
}

pub fn build_googlesheets_batch_get_values_payload(ranges: Vec<String>) -> Payload {
    let mut query = QueryParams::new();
    query.insert("ranges".to_string(), QueryValue::Many(ranges));
    build_googlesheets_invoke_payload(
        HttpMethod::Get,
        "/values:batchGet",
        HttpApiOptions {
            query: Some(query),
            ..Default::default()
        },
    )
}

pub fn build_googlesheets_batch_update_values_payload(
    data: Vec<ValueRange>,
    value_input_option: ValueInputOption,
) -> Payload {
    build_googlesheets_invoke_payload(
        HttpMethod::Post,
        "/values:batchUpdate",
        HttpApiOptions {
            body: Some(JsonBody(json!({ "valueInputOption": value_input_option, "data": data }))),
            ..Default::default()
        },
    )
}

/// Spreadsheet metadata
pub fn build_googlesheets_get_spreadsheet_payload() -> Payload {
    build_googlesheets_invoke_payload(HttpMethod::Get, "/", HttpApiOptions::default())
}

/// Structural updates (formatting, sheets, properties)
pub fn build_googlesheets_batch_update_payload(requests: Vec<Value>) -> Payload {
    build_googlesheets_invoke_payload(
        HttpMethod::Post,
        "/:batchUpdate",
        HttpApiOptions {
            body: Some(JsonBody(json!({ "requests": requests }))),
            ..Default::default()
        },
    )
}

// ============================================================================
// Outreach, Slack, GraphQL
// ============================================================================

pub fn build_outreach_invoke_payload(method: HttpMethod, path: impl Into<String>, options: OutreachOptions) -> Payload {
    Payload::Outreach(OutreachPayload {
        method,
        path: path.into(),
        query_params: options.query_params,
        body: options.body,
        timeout_ms: timeout_or_default(ResourceKind::Outreach, options.timeout_ms),
    })
}

pub fn build_slack_invoke_payload(method: impl Into<String>, options: SlackOptions) -> Payload {
    Payload::Slack(SlackPayload {
        method: method.into(),
        body: options.body,
        timeout_ms: timeout_or_default(ResourceKind::Slack, options.timeout_ms),
    })
}

pub fn build_graphql_invoke_payload(query: impl Into<String>, options: GraphQlOptions) -> Payload {
    Payload::GraphQl(GraphQlPayload {
        query: query.into(),
        variables: options.variables,
        operation_name: options.operation_name,
        timeout_ms: timeout_or_default(ResourceKind::GraphQl, options.timeout_ms),
    })
}
