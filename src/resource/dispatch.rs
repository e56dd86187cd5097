//! Dynamic dispatch
//!
//! Maps (subtype, method name, extracted params) to the right payload builder.
//! Used when a call was recorded as strings and must be replayed without
//! static knowledge of its arguments.
//!
//! Parameter names are matched case-insensitively. A parameter that does not
//! fit the builder's argument type is dropped with a warning, so the server
//! reports the problem rather than the client.

use super::builders::analytics::{self, GaDateRange, GaDimension, GaMetric, GaPageOptions, GaRunReportOptions};
use super::builders::auth;
use super::builders::bigquery::{self, BigQueryQueryOptions, BigQueryTableSchema};
use super::builders::build_raw_invoke_payload;
use super::builders::cosmosdb::{self, CosmosItemOptions, CosmosPatchOperation, CosmosPatchOptions, CosmosQueryOptions};
use super::builders::dynamodb::{self, DynamoDbCommand};
use super::builders::http_api::{self, CustomApiOptions, GraphQlOptions, HttpApiOptions, HttpMethod, OutreachOptions, SlackOptions, ValueInputOption, ValueRange};
use super::builders::lambda::{self, LambdaInvokeOptions};
use super::builders::s3::{self, S3Command};
use super::builders::snowflake::{self, SnowflakeExecuteOptions};
use super::builders::sql::{self, DbParam};
use super::kind::ResourceKind;
use super::payload::Payload;
use crate::error::Result;
use crate::params::{ExtractedParam, ParamTable};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `{ timeoutMs }` option bag
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeoutOptions {
    #[serde(default)]
    timeout_ms: Option<u64>,
}

/// `{ maxResults }` option bag
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListOptions {
    #[serde(default)]
    max_results: Option<u64>,
}

/// `{ partition }` option bag
#[derive(Debug, Default, Deserialize)]
struct StatusOptions {
    #[serde(default)]
    partition: Option<u64>,
}

/// Build a payload from string-encoded call parameters.
///
/// Fails with [`crate::ResourceError::UnsupportedSubtype`] before looking at
/// `method` or `params` when `subtype` is unknown.
pub fn build_payload_from_extracted_params(subtype: &str, method: &str, params: &[ExtractedParam]) -> Result<Payload> {
    let kind: ResourceKind = subtype.parse()?;
    tracing::debug!("build_payload: subtype={}, method={}, params={}", subtype, method, params.len());

    let p = ParamTable::new(params);
    match kind {
        ResourceKind::Postgres => Ok(sql::build_postgres_invoke_payload(
            p.string("SQL"),
            p.decode::<Vec<DbParam>>("Params"),
            p.millis("Timeout"),
        )),
        ResourceKind::Mssql => Ok(sql::build_mssql_invoke_payload(
            p.string("SQL"),
            p.decode::<BTreeMap<String, DbParam>>("Params"),
            p.millis("Timeout"),
        )),
        ResourceKind::Neo4j => Ok(sql::build_neo4j_invoke_payload(
            p.string("Cypher"),
            p.decode::<Map<String, Value>>("Params"),
            p.millis("Timeout"),
        )),
        ResourceKind::DynamoDb => dispatch_dynamodb(&p),
        ResourceKind::CosmosDb => dispatch_cosmosdb(method, &p),
        ResourceKind::Snowflake => dispatch_snowflake(method, &p),
        ResourceKind::BigQuery => dispatch_bigquery(method, &p),
        ResourceKind::S3 => dispatch_s3(&p),
        ResourceKind::Lambda => Ok(lambda::build_lambda_invoke_payload(
            p.string("FunctionName"),
            p.value("Payload"),
            p.decode_or_default::<LambdaInvokeOptions>("Options"),
        )),
        ResourceKind::GoogleSheets => dispatch_googlesheets(method, &p),
        ResourceKind::Salesforce => dispatch_salesforce(method, &p),
        ResourceKind::HubSpot => match http_method(&p) {
            Some(verb) => Ok(http_api::build_hubspot_invoke_payload(
                verb,
                p.string("Path"),
                p.decode_or_default::<HttpApiOptions>("Options"),
            )),
            None => raw_http_call(kind, &p),
        },
        ResourceKind::Custom => match http_method(&p) {
            Some(verb) => Ok(http_api::build_custom_api_invoke_payload(
                verb,
                p.string("Path"),
                p.decode_or_default::<CustomApiOptions>("Options"),
            )),
            None => raw_http_call(kind, &p),
        },
        ResourceKind::Outreach => match http_method(&p) {
            Some(verb) => Ok(http_api::build_outreach_invoke_payload(
                verb,
                p.string("Path"),
                p.decode_or_default::<OutreachOptions>("Options"),
            )),
            None => raw_http_call(kind, &p),
        },
        ResourceKind::Slack => Ok(http_api::build_slack_invoke_payload(
            p.string("Method"),
            p.decode_or_default::<SlackOptions>("Options"),
        )),
        ResourceKind::GraphQl => Ok(http_api::build_graphql_invoke_payload(
            p.string("Query"),
            p.decode_or_default::<GraphQlOptions>("Options"),
        )),
        ResourceKind::GoogleAnalytics => dispatch_googleanalytics(method, &p),
        ResourceKind::MajorAuth => match method {
            "shareAccess" => Ok(auth::build_auth_share_access_payload(p.string("Email"))),
            "revokeAccess" => Ok(auth::build_auth_revoke_access_payload(p.string("Email"))),
            _ => raw(kind, &p),
        },
    }
}

/// Pass the `Payload` parameter through unchanged
fn raw(kind: ResourceKind, p: &ParamTable) -> Result<Payload> {
    build_raw_invoke_payload(kind, p.value("Payload").unwrap_or(Value::Null))
}

/// HTTP verb from the `Method` parameter, accepted in any case
fn http_method(p: &ParamTable) -> Option<HttpMethod> {
    let verb = p.opt_string("Method")?.to_uppercase();
    match serde_json::from_value(Value::String(verb)) {
        Ok(method) => Some(method),
        Err(_) => {
            tracing::warn!("Parameter Method is not an HTTP verb, passing the call through unchecked");
            None
        },
    }
}

/// Forward an HTTP-shaped call whose method could not be typed
fn raw_http_call(kind: ResourceKind, p: &ParamTable) -> Result<Payload> {
    let mut body = match p.value("Options") {
        Some(Value::Object(options)) => options,
        _ => Map::new(),
    };
    if let Some(method) = p.value("Method") {
        body.insert("method".to_string(), method);
    }
    body.insert("path".to_string(), Value::String(p.string("Path")));
    build_raw_invoke_payload(kind, Value::Object(body))
}

// =============================================================================
// DynamoDB / S3
// =============================================================================

fn dispatch_dynamodb(p: &ParamTable) -> Result<Payload> {
    let params = p.value("Params").unwrap_or(Value::Null);
    match p.decode::<DynamoDbCommand>("Command") {
        Some(command) => Ok(dynamodb::build_dynamodb_invoke_payload(command, params)),
        None => {
            let mut body = Map::new();
            if let Some(command) = p.value("Command") {
                body.insert("command".to_string(), command);
            }
            if !params.is_null() {
                body.insert("params".to_string(), params);
            }
            build_raw_invoke_payload(ResourceKind::DynamoDb, Value::Object(body))
        },
    }
}

fn dispatch_s3(p: &ParamTable) -> Result<Payload> {
    let options = p.decode_or_default::<TimeoutOptions>("Options");
    match p.decode::<S3Command>("Command") {
        Some(command) => Ok(s3::build_s3_invoke_payload(
            command,
            p.decode_or_default::<Map<String, Value>>("Params"),
            options.timeout_ms,
        )),
        None => {
            let mut body = Map::new();
            if let Some(command) = p.value("Command") {
                body.insert("command".to_string(), command);
            }
            body.insert("params".to_string(), p.value("Params").unwrap_or_else(|| Value::Object(Map::new())));
            if let Some(timeout_ms) = options.timeout_ms {
                body.insert("timeoutMs".to_string(), Value::from(timeout_ms));
            }
            build_raw_invoke_payload(ResourceKind::S3, Value::Object(body))
        },
    }
}

// =============================================================================
// Cosmos DB
// =============================================================================

fn dispatch_cosmosdb(method: &str, p: &ParamTable) -> Result<Payload> {
    let container = || p.string("Container");
    let body = || p.decode_or_default::<Map<String, Value>>("Body");

    match method {
        "query" => Ok(cosmosdb::build_cosmosdb_query_payload(
            container(),
            p.string("Query"),
            p.decode_or_default::<CosmosQueryOptions>("Options"),
        )),
        "read" => Ok(cosmosdb::build_cosmosdb_read_payload(
            container(),
            p.string("Id"),
            p.decode_or_default::<CosmosItemOptions>("Options"),
        )),
        "create" => Ok(cosmosdb::build_cosmosdb_create_payload(
            container(),
            body(),
            p.decode_or_default::<CosmosItemOptions>("Options"),
        )),
        "replace" => Ok(cosmosdb::build_cosmosdb_replace_payload(
            container(),
            p.string("Id"),
            body(),
            p.decode_or_default::<CosmosItemOptions>("Options"),
        )),
        "upsert" => Ok(cosmosdb::build_cosmosdb_upsert_payload(
            container(),
            body(),
            p.decode_or_default::<CosmosItemOptions>("Options"),
        )),
        "delete" => Ok(cosmosdb::build_cosmosdb_delete_payload(
            container(),
            p.string("Id"),
            p.decode_or_default::<CosmosItemOptions>("Options"),
        )),
        "patch" => Ok(cosmosdb::build_cosmosdb_patch_payload(
            container(),
            p.string("Id"),
            p.decode_or_default::<Vec<CosmosPatchOperation>>("PatchOperations"),
            p.decode_or_default::<CosmosPatchOptions>("Options"),
        )),
        // "invoke" and anything unknown
        _ => raw(ResourceKind::CosmosDb, p),
    }
}

// =============================================================================
// Snowflake
// =============================================================================

fn dispatch_snowflake(method: &str, p: &ParamTable) -> Result<Payload> {
    match method {
        "execute" => Ok(snowflake::build_snowflake_execute_payload(
            p.string("Statement"),
            p.decode_or_default::<SnowflakeExecuteOptions>("Options"),
        )),
        "status" => Ok(snowflake::build_snowflake_status_payload(
            p.string("StatementHandle"),
            p.decode_or_default::<StatusOptions>("Options").partition,
        )),
        "cancel" => Ok(snowflake::build_snowflake_cancel_payload(p.string("StatementHandle"))),
        _ => raw(ResourceKind::Snowflake, p),
    }
}

// =============================================================================
// BigQuery
// =============================================================================

fn dispatch_bigquery(method: &str, p: &ParamTable) -> Result<Payload> {
    match method {
        "query" => Ok(bigquery::build_bigquery_query_payload(
            p.string("SQL"),
            p.decode::<Map<String, Value>>("Params"),
            p.decode_or_default::<BigQueryQueryOptions>("Options"),
        )),
        "listDatasets" => Ok(bigquery::build_bigquery_list_datasets_payload(
            p.decode_or_default::<ListOptions>("Options").max_results,
        )),
        "listTables" => Ok(bigquery::build_bigquery_list_tables_payload(
            p.string("DatasetId"),
            p.decode_or_default::<ListOptions>("Options").max_results,
        )),
        "getTable" => Ok(bigquery::build_bigquery_get_table_payload(
            p.string("DatasetId"),
            p.string("TableId"),
        )),
        "insertRows" => Ok(bigquery::build_bigquery_insert_rows_payload(
            p.string("DatasetId"),
            p.string("TableId"),
            p.decode_or_default::<Vec<Map<String, Value>>>("Rows"),
        )),
        "createTable" => Ok(bigquery::build_bigquery_create_table_payload(
            p.string("DatasetId"),
            p.string("TableId"),
            p.decode_or_default::<BigQueryTableSchema>("Schema"),
            p.decode_or_default::<TimeoutOptions>("Options").timeout_ms,
        )),
        _ => raw(ResourceKind::BigQuery, p),
    }
}

// =============================================================================
// Google Analytics
// =============================================================================

fn dispatch_googleanalytics(method: &str, p: &ParamTable) -> Result<Payload> {
    match method {
        "runReport" => Ok(analytics::build_googleanalytics_run_report_payload(
            p.decode_or_default::<Vec<GaDimension>>("Dimensions"),
            p.decode_or_default::<Vec<GaMetric>>("Metrics"),
            p.decode_or_default::<Vec<GaDateRange>>("DateRanges"),
            p.decode_or_default::<GaRunReportOptions>("Options"),
        )),
        "batchRunReports" => Ok(analytics::build_googleanalytics_batch_run_reports_payload(
            p.decode_or_default("Requests"),
        )),
        "getMetadata" => Ok(analytics::build_googleanalytics_get_metadata_payload()),
        "runRealtimeReport" => Ok(analytics::build_googleanalytics_run_realtime_report_payload(
            p.decode_or_default::<Vec<GaMetric>>("Metrics"),
            p.decode::<Vec<GaDimension>>("Dimensions"),
            p.decode("Limit"),
        )),
        "listAccounts" => Ok(analytics::build_googleanalytics_list_accounts_payload(
            p.decode_or_default::<GaPageOptions>("Options"),
        )),
        "listProperties" => Ok(analytics::build_googleanalytics_list_properties_payload(
            p.opt_string("AccountId"),
            p.decode_or_default::<GaPageOptions>("Options"),
        )),
        "listDataStreams" => Ok(analytics::build_googleanalytics_list_data_streams_payload(
            p.opt_string("PropertyId"),
            p.decode_or_default::<GaPageOptions>("Options"),
        )),
        _ => raw(ResourceKind::GoogleAnalytics, p),
    }
}

// =============================================================================
// Google Sheets
// =============================================================================

fn dispatch_googlesheets(method: &str, p: &ParamTable) -> Result<Payload> {
    let value_input = || p.decode_or_default::<ValueInputOption>("ValueInputOption");

    match method {
        "getValues" => Ok(http_api::build_googlesheets_get_values_payload(&p.string("Range"))),
        "updateValues" => Ok(http_api::build_googlesheets_update_values_payload(
            &p.string("Range"),
            p.decode_or_default::<Vec<Vec<Value>>>("Values"),
            value_input(),
        )),
        "appendValues" => Ok(http_api::build_googlesheets_append_values_payload(
            &p.string("Range"),
            p.decode_or_default::<Vec<Vec<Value>>>("Values"),
            value_input(),
        )),
        "clearValues" => Ok(http_api::build_googlesheets_clear_values_payload(&p.string("Range"))),
        "batchGetValues" => Ok(http_api::build_googlesheets_batch_get_values_payload(
            p.decode_or_default::<Vec<String>>("Ranges"),
        )),
        "batchUpdateValues" => Ok(http_api::build_googlesheets_batch_update_values_payload(
            p.decode_or_default::<Vec<ValueRange>>("Data"),
            value_input(),
        )),
        "getSpreadsheet" => Ok(http_api::build_googlesheets_get_spreadsheet_payload()),
        "batchUpdate" => Ok(http_api::build_googlesheets_batch_update_payload(
            p.decode_or_default::<Vec<Value>>("Requests"),
        )),
        _ => match http_method(p) {
            Some(verb) => Ok(http_api::build_googlesheets_invoke_payload(
                verb,
                p.string("Path"),
                p.decode_or_default::<HttpApiOptions>("Options"),
            )),
            None => raw_http_call(ResourceKind::GoogleSheets, p),
        },
    }
}

// =============================================================================
// Salesforce
// =============================================================================

fn dispatch_salesforce(method: &str, p: &ParamTable) -> Result<Payload> {
    match method {
        "query" => Ok(http_api::build_salesforce_query_payload(p.string("Query"))),
        "getRecord" => Ok(http_api::build_salesforce_get_record_payload(
            &p.string("ObjectType"),
            &p.string("RecordId"),
            &p.decode_or_default::<Vec<String>>("Fields"),
        )),
        "createRecord" => Ok(http_api::build_salesforce_create_record_payload(
            &p.string("ObjectType"),
            p.decode_or_default::<Map<String, Value>>("Data"),
        )),
        "updateRecord" => Ok(http_api::build_salesforce_update_record_payload(
            &p.string("ObjectType"),
            &p.string("RecordId"),
            p.decode_or_default::<Map<String, Value>>("Data"),
        )),
        "deleteRecord" => Ok(http_api::build_salesforce_delete_record_payload(
            &p.string("ObjectType"),
            &p.string("RecordId"),
        )),
        "describeObject" => Ok(http_api::build_salesforce_describe_object_payload(&p.string("ObjectType"))),
        _ => match http_method(p) {
            Some(verb) => Ok(http_api::build_salesforce_invoke_payload(
                verb,
                p.string("Path"),
                p.decode_or_default::<HttpApiOptions>("Options"),
            )),
            None => raw_http_call(ResourceKind::Salesforce, p),
        },
    }
}
