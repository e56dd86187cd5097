//! Canonical invocation payload
//!
//! One variant per resource kind holds that kind's typed fields. Multi-operation
//! kinds carry an operation enum, so a payload can only hold the fields of the
//! operation it names. The wire form (flat or embedded) is produced on demand
//! by [`Payload::to_wire`].

use super::builders::analytics::GoogleAnalyticsOperation;
use super::builders::auth::AuthPayload;
use super::builders::bigquery::BigQueryOperation;
use super::builders::cosmosdb::CosmosDbOperation;
use super::builders::dynamodb::DynamoDbPayload;
use super::builders::http_api::{CustomApiPayload, GraphQlPayload, HttpApiPayload, OutreachPayload, SlackPayload};
use super::builders::lambda::LambdaPayload;
use super::builders::s3::S3Payload;
use super::builders::snowflake::SnowflakeOperation;
use super::builders::sql::{MssqlPayload, Neo4jPayload, PostgresPayload};
use super::kind::{Category, ResourceKind};
use super::layout::{self, WireLayout};
use super::registry;
use crate::error::{ResourceError, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Caller-shaped body passed through verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub kind: ResourceKind,
    pub body: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Postgres(PostgresPayload),
    Mssql(MssqlPayload),
    Neo4j(Neo4jPayload),
    DynamoDb(DynamoDbPayload),
    CosmosDb(CosmosDbOperation),
    Snowflake(SnowflakeOperation),
    BigQuery(BigQueryOperation),
    S3(S3Payload),
    Lambda(LambdaPayload),
    Custom(CustomApiPayload),
    HubSpot(HttpApiPayload),
    Salesforce(HttpApiPayload),
    GoogleSheets(HttpApiPayload),
    GoogleAnalytics(GoogleAnalyticsOperation),
    Outreach(OutreachPayload),
    Slack(SlackPayload),
    GraphQl(GraphQlPayload),
    MajorAuth(AuthPayload),
    Raw(RawPayload),
}

impl Payload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Payload::Postgres(_) => ResourceKind::Postgres,
            Payload::Mssql(_) => ResourceKind::Mssql,
            Payload::Neo4j(_) => ResourceKind::Neo4j,
            Payload::DynamoDb(_) => ResourceKind::DynamoDb,
            Payload::CosmosDb(_) => ResourceKind::CosmosDb,
            Payload::Snowflake(_) => ResourceKind::Snowflake,
            Payload::BigQuery(_) => ResourceKind::BigQuery,
            Payload::S3(_) => ResourceKind::S3,
            Payload::Lambda(_) => ResourceKind::Lambda,
            Payload::Custom(_) => ResourceKind::Custom,
            Payload::HubSpot(_) => ResourceKind::HubSpot,
            Payload::Salesforce(_) => ResourceKind::Salesforce,
            Payload::GoogleSheets(_) => ResourceKind::GoogleSheets,
            Payload::GoogleAnalytics(_) => ResourceKind::GoogleAnalytics,
            Payload::Outreach(_) => ResourceKind::Outreach,
            Payload::Slack(_) => ResourceKind::Slack,
            Payload::GraphQl(_) => ResourceKind::GraphQl,
            Payload::MajorAuth(_) => ResourceKind::MajorAuth,
            Payload::Raw(raw) => raw.kind,
        }
    }

    pub fn category(&self) -> Category {
        self.kind().category()
    }

    /// Operation name for multi-operation kinds
    pub fn operation(&self) -> Option<&str> {
        match self {
            Payload::CosmosDb(op) => Some(op.name()),
            Payload::Snowflake(op) => Some(op.name()),
            Payload::BigQuery(op) => Some(op.name()),
            Payload::GoogleAnalytics(op) => Some(op.name()),
            Payload::Raw(raw) => raw
                .body
                .get("operation")
                .or_else(|| raw.body.get(raw.kind.as_str()).and_then(|inner| inner.get("operation")))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    /// Kind-specific fields, without `type`/`subtype`
    fn fields(&self) -> Result<Map<String, Value>> {
        let value = match self {
            Payload::Postgres(p) => serde_json::to_value(p)?,
            Payload::Mssql(p) => serde_json::to_value(p)?,
            Payload::Neo4j(p) => serde_json::to_value(p)?,
            Payload::DynamoDb(p) => serde_json::to_value(p)?,
            Payload::CosmosDb(op) => serde_json::to_value(op)?,
            Payload::Snowflake(op) => serde_json::to_value(op)?,
            Payload::BigQuery(op) => serde_json::to_value(op)?,
            Payload::S3(p) => serde_json::to_value(p)?,
            Payload::Lambda(p) => serde_json::to_value(p)?,
            Payload::Custom(p) => serde_json::to_value(p)?,
            Payload::HubSpot(p) | Payload::Salesforce(p) | Payload::GoogleSheets(p) => serde_json::to_value(p)?,
            Payload::GoogleAnalytics(op) => serde_json::to_value(op)?,
            Payload::Outreach(p) => serde_json::to_value(p)?,
            Payload::Slack(p) => serde_json::to_value(p)?,
            Payload::GraphQl(p) => serde_json::to_value(p)?,
            Payload::MajorAuth(p) => serde_json::to_value(p)?,
            Payload::Raw(raw) => return Ok(raw.body.clone()),
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ResourceError::Decode(format!(
                "{} payload serialized to a non-object: {}",
                self.kind(),
                other
            ))),
        }
    }

    /// Encode for the wire in the given layout.
    ///
    /// Raw payloads ignore `layout`: their body is sent exactly as the caller shaped it.
    pub fn to_wire(&self, layout: WireLayout) -> Result<Value> {
        let fields = self.fields()?;
        let layout = match self {
            Payload::Raw(_) => WireLayout::Flat,
            _ => layout,
        };
        Ok(layout::encode(self.kind(), layout, fields))
    }

    /// Encode in the kind's authoritative layout
    pub fn to_default_wire(&self) -> Result<Value> {
        self.to_wire(registry::default_layout(self.kind()))
    }

    /// Decode a wire payload of either layout, reporting which one it used
    pub fn from_wire(value: &Value) -> Result<(Payload, WireLayout)> {
        let decoded = layout::decode(value)?;
        let kind = decoded.kind;
        let fields = decoded.fields;

        let def = registry::kind_def(kind);
        if let Some(operation) = fields.get("operation") {
            let name = operation.as_str().unwrap_or_default();
            if !def.allows_operation(name) {
                return Err(ResourceError::UnsupportedOperation {
                    subtype: kind.as_str().to_string(),
                    operation: operation.as_str().map(str::to_string).unwrap_or_else(|| operation.to_string()),
                });
            }
        }

        let payload = match kind {
            ResourceKind::Postgres => Payload::Postgres(typed(kind, fields)?),
            ResourceKind::Mssql => Payload::Mssql(typed(kind, fields)?),
            ResourceKind::Neo4j => Payload::Neo4j(typed(kind, fields)?),
            ResourceKind::DynamoDb => Payload::DynamoDb(typed(kind, fields)?),
            ResourceKind::CosmosDb => Payload::CosmosDb(typed(kind, fields)?),
            ResourceKind::Snowflake => Payload::Snowflake(typed(kind, fields)?),
            ResourceKind::BigQuery => Payload::BigQuery(typed(kind, fields)?),
            ResourceKind::S3 => Payload::S3(typed(kind, fields)?),
            ResourceKind::Lambda => Payload::Lambda(typed(kind, fields)?),
            ResourceKind::Custom => Payload::Custom(typed(kind, fields)?),
            ResourceKind::HubSpot => Payload::HubSpot(typed(kind, fields)?),
            ResourceKind::Salesforce => Payload::Salesforce(typed(kind, fields)?),
            ResourceKind::GoogleSheets => Payload::GoogleSheets(typed(kind, fields)?),
            ResourceKind::GoogleAnalytics => Payload::GoogleAnalytics(typed(kind, fields)?),
            ResourceKind::Outreach => Payload::Outreach(typed(kind, fields)?),
            ResourceKind::Slack => Payload::Slack(typed(kind, fields)?),
            ResourceKind::GraphQl => Payload::GraphQl(typed(kind, fields)?),
            ResourceKind::MajorAuth => Payload::MajorAuth(typed(kind, fields)?),
        };

        Ok((payload, decoded.layout))
    }
}

fn typed<T: DeserializeOwned>(kind: ResourceKind, fields: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ResourceError::Decode(format!("invalid {} payload: {}", kind, e)))
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_default_wire()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Payload::from_wire(&value)
            .map(|(payload, _)| payload)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::builders::analytics::*;
    use crate::resource::builders::auth::*;
    use crate::resource::builders::bigquery::*;
    use crate::resource::builders::cosmosdb::*;
    use crate::resource::builders::dynamodb::{build_dynamodb_invoke_payload, DynamoDbCommand};
    use crate::resource::builders::http_api::*;
    use crate::resource::builders::lambda::*;
    use crate::resource::builders::s3::{build_s3_invoke_payload, S3Command};
    use crate::resource::builders::snowflake::*;
    use crate::resource::builders::sql::*;
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    /// One payload per kind, plus every operation of the multi-operation kinds
    fn every_kind_and_operation() -> Vec<Payload> {
        let report = GaReportRequest {
            dimensions: Some(vec![GaDimension { name: "country".into() }]),
            metrics: Some(vec![GaMetric { name: "sessions".into() }]),
            ..Default::default()
        };
        let page = GaPageOptions {
            page_size: Some(50),
            page_token: Some("next".into()),
        };
        let item = CosmosItemOptions {
            partition_key: Some(PartitionKey::Hierarchical(vec!["tenant-1".into(), 7_i64.into()])),
            timeout_ms: Some(2000),
        };
        let bindings = BTreeMap::from([(
            "1".to_string(),
            SnowflakeBinding {
                binding_type: SnowflakeBindingType::Fixed,
                value: 42_i64.into(),
            },
        )]);

        vec![
            build_postgres_invoke_payload("SELECT $1", Some(vec![1_i64.into(), DbParam::Null]), Some(1000)),
            build_mssql_invoke_payload("SELECT @id", Some(BTreeMap::from([("id".to_string(), "a".into())])), None),
            build_neo4j_invoke_payload("MATCH (n) RETURN n LIMIT $n", Some(object(json!({ "n": 5 }))), None),
            build_dynamodb_invoke_payload(DynamoDbCommand::GetItem, json!({ "TableName": "t", "Key": { "id": { "S": "1" } } })),
            // CosmosDB
            build_cosmosdb_query_payload(
                "orders",
                "SELECT * FROM c WHERE c.total > @min",
                CosmosQueryOptions {
                    parameters: Some(vec![CosmosQueryParameter { name: "@min".into(), value: json!(10.5) }]),
                    max_item_count: Some(25),
                    continuation_token: Some("tok".into()),
                    ..Default::default()
                },
            ),
            build_cosmosdb_read_payload("orders", "o-1", item.clone()),
            build_cosmosdb_create_payload("orders", object(json!({ "id": "o-2", "total": 3 })), item.clone()),
            build_cosmosdb_replace_payload("orders", "o-2", object(json!({ "id": "o-2", "total": 4 })), CosmosItemOptions::default()),
            build_cosmosdb_upsert_payload("orders", object(json!({ "id": "o-3" })), CosmosItemOptions::default()),
            build_cosmosdb_delete_payload("orders", "o-3", item),
            build_cosmosdb_patch_payload(
                "orders",
                "o-1",
                vec![
                    CosmosPatchOperation { op: PatchOp::Incr, path: "/total".into(), value: Some(json!(1)) },
                    CosmosPatchOperation { op: PatchOp::Remove, path: "/draft".into(), value: None },
                ],
                CosmosPatchOptions {
                    condition: Some("FROM c WHERE c.open = true".into()),
                    ..Default::default()
                },
            ),
            // Snowflake
            build_snowflake_execute_payload(
                "SELECT ?",
                SnowflakeExecuteOptions {
                    bindings: Some(bindings),
                    warehouse: Some("WH".into()),
                    timeout: Some(60),
                    run_async: Some(true),
                    ..Default::default()
                },
            ),
            build_snowflake_status_payload("01b2-handle", Some(1)),
            build_snowflake_cancel_payload("01b2-handle"),
            // BigQuery
            build_bigquery_query_payload(
                "SELECT @n",
                Some(object(json!({ "n": 1 }))),
                BigQueryQueryOptions { timeout_ms: Some(5000), max_results: None },
            ),
            build_bigquery_list_datasets_payload(Some(10)),
            build_bigquery_list_tables_payload("sales", None),
            build_bigquery_get_table_payload("sales", "orders"),
            build_bigquery_insert_rows_payload("sales", "orders", vec![object(json!({ "id": 1, "note": null }))]),
            build_bigquery_create_table_payload(
                "sales",
                "refunds",
                BigQueryTableSchema {
                    fields: vec![BigQueryFieldSchema {
                        name: "id".into(),
                        field_type: "INTEGER".into(),
                        mode: Some("REQUIRED".into()),
                        description: None,
                        fields: None,
                    }],
                },
                Some(30000),
            ),
            build_s3_invoke_payload(S3Command::GeneratePresignedUrl, object(json!({ "Bucket": "b", "Key": "k" })), Some(900)),
            build_lambda_invoke_payload(
                "arn:aws:lambda:us-east-1:123:function:f",
                Some(json!({ "orderId": 7 })),
                LambdaInvokeOptions {
                    invocation_type: Some(LambdaInvocationType::Event),
                    log_type: Some(LambdaLogType::Tail),
                    ..Default::default()
                },
            ),
            build_custom_api_invoke_payload(
                HttpMethod::Post,
                "/upload",
                CustomApiOptions {
                    query: Some(BTreeMap::from([("tag".to_string(), QueryValue::Many(vec!["a".into(), "b".into()]))])),
                    headers: Some(BTreeMap::from([("x-trace".to_string(), "1".to_string())])),
                    body: Some(BodyPayload::Bytes { base64: "aGVsbG8=".into(), content_type: Some("text/plain".into()) }),
                    timeout_ms: None,
                },
            ),
            build_hubspot_invoke_payload(
                HttpMethod::Post,
                "/crm/v3/objects/contacts",
                HttpApiOptions {
                    body: Some(JsonBody(json!({ "properties": { "email": "a@b.c" } }))),
                    ..Default::default()
                },
            ),
            build_salesforce_query_payload("SELECT Id FROM Account"),
            build_salesforce_update_record_payload("Account", "001", object(json!({ "Name": "Acme" }))),
            build_googlesheets_append_values_payload("Sheet1!A1", vec![vec![json!("x"), json!(1)]], ValueInputOption::Raw),
            build_googlesheets_batch_get_values_payload(vec!["A1:B2".into(), "C1".into()]),
            // Google Analytics
            build_googleanalytics_run_report_payload(
                vec![GaDimension { name: "date".into() }],
                vec![GaMetric { name: "activeUsers".into() }],
                vec![GaDateRange { start_date: "7daysAgo".into(), end_date: "today".into() }],
                GaRunReportOptions { limit: Some(100), ..Default::default() },
            ),
            build_googleanalytics_batch_run_reports_payload(vec![report]),
            build_googleanalytics_get_metadata_payload(),
            build_googleanalytics_run_realtime_report_payload(vec![GaMetric { name: "activeUsers".into() }], None, Some(10)),
            build_googleanalytics_list_accounts_payload(page.clone()),
            build_googleanalytics_list_properties_payload(Some("accounts/1".into()), page.clone()),
            build_googleanalytics_list_data_streams_payload(None, page),
            build_outreach_invoke_payload(
                HttpMethod::Get,
                "/api/v2/prospects",
                OutreachOptions {
                    query_params: Some(BTreeMap::from([("page[size]".to_string(), "25".into())])),
                    ..Default::default()
                },
            ),
            build_slack_invoke_payload(
                "chat.postMessage",
                SlackOptions { body: Some(object(json!({ "channel": "C1", "text": "hi" }))), timeout_ms: None },
            ),
            build_graphql_invoke_payload(
                "query($id: ID!) { node(id: $id) { id } }",
                GraphQlOptions {
                    variables: Some(object(json!({ "id": "n1" }))),
                    operation_name: None,
                    timeout_ms: Some(4000),
                },
            ),
            build_auth_share_access_payload("user@example.com"),
            build_auth_revoke_access_payload("user@example.com"),
        ]
    }

    #[test]
    fn test_every_kind_and_operation_round_trips_in_both_layouts() {
        let payloads = every_kind_and_operation();

        for payload in &payloads {
            for layout in [WireLayout::Flat, WireLayout::Embedded] {
                let wire = payload.to_wire(layout).unwrap();
                let (decoded, detected) = Payload::from_wire(&wire)
                    .unwrap_or_else(|e| panic!("{} {:?} in {:?}: {}", payload.kind(), payload.operation(), layout, e));
                assert_eq!(&decoded, payload, "{:?} {:?}", payload.kind(), layout);
                assert_eq!(detected, layout, "{:?}", payload.kind());
            }
        }

        let kinds: BTreeSet<&str> = payloads.iter().map(|p| p.kind().as_str()).collect();
        assert_eq!(kinds.len(), ResourceKind::ALL.len());

        for kind in [ResourceKind::CosmosDb, ResourceKind::Snowflake, ResourceKind::BigQuery, ResourceKind::GoogleAnalytics] {
            let covered: BTreeSet<&str> = payloads
                .iter()
                .filter(|p| p.kind() == kind)
                .filter_map(|p| p.operation())
                .collect();
            let declared: BTreeSet<&str> = registry::kind_def(kind).operations.iter().map(String::as_str).collect();
            assert_eq!(covered, declared, "{}", kind);
        }
    }

    #[test]
    fn test_default_wire_uses_registry_layout() {
        let hubspot = build_hubspot_invoke_payload(HttpMethod::Get, "/crm/v3/objects/deals", HttpApiOptions::default());
        let wire = hubspot.to_default_wire().unwrap();
        assert_eq!(wire["hubspot"]["path"], "/crm/v3/objects/deals");

        let pg = build_postgres_invoke_payload("SELECT 1", None, None);
        let wire = pg.to_default_wire().unwrap();
        assert_eq!(wire["sql"], "SELECT 1");
    }

    #[test]
    fn test_from_wire_accepts_both_layouts() {
        let payload = build_dynamodb_invoke_payload(DynamoDbCommand::Scan, json!({ "TableName": "t" }));
        for layout in [WireLayout::Flat, WireLayout::Embedded] {
            let wire = payload.to_wire(layout).unwrap();
            let (decoded, detected) = Payload::from_wire(&wire).unwrap();
            assert_eq!(decoded, payload);
            assert_eq!(detected, layout);
        }
    }

    #[test]
    fn test_from_wire_rejects_undeclared_operation() {
        let wire = json!({ "type": "database", "subtype": "cosmosdb", "operation": "truncate", "container": "c" });
        assert!(matches!(
            Payload::from_wire(&wire),
            Err(ResourceError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_from_wire_reports_bad_fields() {
        let wire = json!({ "type": "database", "subtype": "postgresql", "sql": 42 });
        assert!(matches!(Payload::from_wire(&wire), Err(ResourceError::Decode(_))));
    }

    #[test]
    fn test_serde_round_trip_through_default_layout() {
        let payload = build_cosmosdb_read_payload("orders", "o-1", CosmosItemOptions::default());
        let text = serde_json::to_string(&payload).unwrap();
        let back: Payload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.category(), Category::Database);
        assert_eq!(back.operation(), Some("read"));
    }
}
