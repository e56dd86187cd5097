//! Google Analytics (GA4 Data and Admin APIs)
//!
//! Filter expressions and order-bys are forwarded as JSON; the server
//! validates their structure.

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaDimension {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaMetric {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaDateRange {
    /// `YYYY-MM-DD` or relative (`7daysAgo`, `today`)
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaRunReportOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_bys: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// One report inside a batch; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaReportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<GaDimension>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<GaMetric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_ranges: Option<Vec<GaDateRange>>,
    #[serde(flatten)]
    pub options: GaRunReportOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaPageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaRunReport {
    pub dimensions: Vec<GaDimension>,
    pub metrics: Vec<GaMetric>,
    pub date_ranges: Vec<GaDateRange>,
    #[serde(flatten)]
    pub options: GaRunReportOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaBatchRunReports {
    pub requests: Vec<GaReportRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaRealtimeReport {
    pub metrics: Vec<GaMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<GaDimension>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaListProperties {
    /// All accessible accounts when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(flatten)]
    pub page: GaPageOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaListDataStreams {
    /// The resource's bound property when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(flatten)]
    pub page: GaPageOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum GoogleAnalyticsOperation {
    RunReport(GaRunReport),
    BatchRunReports(GaBatchRunReports),
    GetMetadata,
    RunRealtimeReport(GaRealtimeReport),
    ListAccounts(GaPageOptions),
    ListProperties(GaListProperties),
    ListDataStreams(GaListDataStreams),
}

impl GoogleAnalyticsOperation {
    pub fn name(&self) -> &'static str {
        match self {
            GoogleAnalyticsOperation::RunReport(_) => "runReport",
            GoogleAnalyticsOperation::BatchRunReports(_) => "batchRunReports",
            GoogleAnalyticsOperation::GetMetadata => "getMetadata",
            GoogleAnalyticsOperation::RunRealtimeReport(_) => "runRealtimeReport",
            GoogleAnalyticsOperation::ListAccounts(_) => "listAccounts",
            GoogleAnalyticsOperation::ListProperties(_) => "listProperties",
            GoogleAnalyticsOperation::ListDataStreams(_) => "listDataStreams",
        }
    }
}

pub fn build_googleanalytics_invoke_payload(operation: GoogleAnalyticsOperation) -> Payload {
    Payload::GoogleAnalytics(operation)
}

pub fn build_googleanalytics_run_report_payload(
    dimensions: Vec<GaDimension>,
    metrics: Vec<GaMetric>,
    date_ranges: Vec<GaDateRange>,
    options: GaRunReportOptions,
) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::RunReport(GaRunReport {
        dimensions,
        metrics,
        date_ranges,
        options,
    }))
}

pub fn build_googleanalytics_batch_run_reports_payload(requests: Vec<GaReportRequest>) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::BatchRunReports(GaBatchRunReports { requests }))
}

pub fn build_googleanalytics_get_metadata_payload() -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::GetMetadata)
}

pub fn build_googleanalytics_run_realtime_report_payload(
    metrics: Vec<GaMetric>,
    dimensions: Option<Vec<GaDimension>>,
    limit: Option<u64>,
) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::RunRealtimeReport(GaRealtimeReport {
        metrics,
        dimensions,
        limit,
    }))
}

pub fn build_googleanalytics_list_accounts_payload(page: GaPageOptions) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::ListAccounts(page))
}

pub fn build_googleanalytics_list_properties_payload(account_id: Option<String>, page: GaPageOptions) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::ListProperties(GaListProperties { account_id, page }))
}

pub fn build_googleanalytics_list_data_streams_payload(property_id: Option<String>, page: GaPageOptions) -> Payload {
    Payload::GoogleAnalytics(GoogleAnalyticsOperation::ListDataStreams(GaListDataStreams { property_id, page }))
}
