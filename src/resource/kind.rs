//! Resource kinds and categories

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse resource category, the payload's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Api,
    Database,
    Storage,
    Auth,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Api => "api",
            Category::Database => "database",
            Category::Storage => "storage",
            Category::Auth => "auth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specific resource technology, the payload's `subtype` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[serde(rename = "postgresql")]
    Postgres,
    Mssql,
    Neo4j,
    #[serde(rename = "dynamodb")]
    DynamoDb,
    #[serde(rename = "cosmosdb")]
    CosmosDb,
    Snowflake,
    #[serde(rename = "bigquery")]
    BigQuery,
    S3,
    Lambda,
    Custom,
    #[serde(rename = "hubspot")]
    HubSpot,
    Salesforce,
    #[serde(rename = "googlesheets")]
    GoogleSheets,
    #[serde(rename = "googleanalytics")]
    GoogleAnalytics,
    Outreach,
    Slack,
    #[serde(rename = "graphql")]
    GraphQl,
    #[serde(rename = "majorauth")]
    MajorAuth,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 18] = [
        ResourceKind::Postgres,
        ResourceKind::Mssql,
        ResourceKind::Neo4j,
        ResourceKind::DynamoDb,
        ResourceKind::CosmosDb,
        ResourceKind::Snowflake,
        ResourceKind::BigQuery,
        ResourceKind::S3,
        ResourceKind::Lambda,
        ResourceKind::Custom,
        ResourceKind::HubSpot,
        ResourceKind::Salesforce,
        ResourceKind::GoogleSheets,
        ResourceKind::GoogleAnalytics,
        ResourceKind::Outreach,
        ResourceKind::Slack,
        ResourceKind::GraphQl,
        ResourceKind::MajorAuth,
    ];

    /// Wire name of the subtype
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Postgres => "postgresql",
            ResourceKind::Mssql => "mssql",
            ResourceKind::Neo4j => "neo4j",
            ResourceKind::DynamoDb => "dynamodb",
            ResourceKind::CosmosDb => "cosmosdb",
            ResourceKind::Snowflake => "snowflake",
            ResourceKind::BigQuery => "bigquery",
            ResourceKind::S3 => "s3",
            ResourceKind::Lambda => "lambda",
            ResourceKind::Custom => "custom",
            ResourceKind::HubSpot => "hubspot",
            ResourceKind::Salesforce => "salesforce",
            ResourceKind::GoogleSheets => "googlesheets",
            ResourceKind::GoogleAnalytics => "googleanalytics",
            ResourceKind::Outreach => "outreach",
            ResourceKind::Slack => "slack",
            ResourceKind::GraphQl => "graphql",
            ResourceKind::MajorAuth => "majorauth",
        }
    }

    /// The payload `type` that always accompanies this subtype
    pub fn category(self) -> Category {
        match self {
            ResourceKind::Postgres
            | ResourceKind::Mssql
            | ResourceKind::Neo4j
            | ResourceKind::DynamoDb
            | ResourceKind::CosmosDb
            | ResourceKind::Snowflake
            | ResourceKind::BigQuery => Category::Database,
            ResourceKind::S3 => Category::Storage,
            ResourceKind::MajorAuth => Category::Auth,
            ResourceKind::Lambda
            | ResourceKind::Custom
            | ResourceKind::HubSpot
            | ResourceKind::Salesforce
            | ResourceKind::GoogleSheets
            | ResourceKind::GoogleAnalytics
            | ResourceKind::Outreach
            | ResourceKind::Slack
            | ResourceKind::GraphQl => Category::Api,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ResourceError::UnsupportedSubtype {
                subtype: s.to_string(),
            })
    }
}
