//! Resource Registry - Load resource kind definitions from JSON
//!
//! Per-kind metadata (category, legal operations, authoritative wire layout,
//! result tag, default timeout) lives in an embedded JSON table so it can be
//! adjusted without touching the builders.

use super::kind::{Category, ResourceKind};
use super::layout::WireLayout;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource kind table (compiled into the binary)
const KINDS_FILE: &str = include_str!("../resources/kinds.json");

/// Kind definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct KindDef {
    pub display_name: String,
    pub category: Category,
    /// Wire generation new payloads are encoded with
    pub layout: WireLayout,
    /// `kind` tag the server puts on successful results
    pub result_kind: String,
    /// Legal values of the payload `operation` field (empty: no operation field)
    #[serde(default)]
    pub operations: Vec<String>,
    /// Timeout hint applied when the caller gives none
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
    /// Method names understood by the dynamic dispatcher
    #[serde(default)]
    pub methods: Vec<String>,
}

impl KindDef {
    pub fn allows_operation(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
    }
}

/// Root structure of resources/kinds.json
#[derive(Debug, Clone, Deserialize)]
struct KindsFile {
    kinds: HashMap<String, KindDef>,
}

/// Definitions indexed in `ResourceKind::ALL` order
pub struct Registry {
    defs: Vec<KindDef>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut file: KindsFile = serde_json::from_str(KINDS_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded resource kinds JSON: {}", e));

        let defs = ResourceKind::ALL
            .iter()
            .map(|kind| {
                let def = file.kinds.remove(kind.as_str()).unwrap_or_else(|| {
                    panic!("Embedded resource kinds JSON has no entry for {}", kind)
                });
                assert_eq!(
                    def.category,
                    kind.category(),
                    "Embedded category for {} disagrees with its subtype",
                    kind
                );
                def
            })
            .collect();

        if !file.kinds.is_empty() {
            let extra: Vec<&String> = file.kinds.keys().collect();
            tracing::warn!("Ignoring unknown resource kinds in registry: {:?}", extra);
        }

        Registry { defs }
    })
}

impl Registry {
    pub fn get(&self, kind: ResourceKind) -> &KindDef {
        &self.defs[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &KindDef)> {
        ResourceKind::ALL.into_iter().zip(self.defs.iter())
    }
}

/// Get a kind definition
pub fn kind_def(kind: ResourceKind) -> &'static KindDef {
    get_registry().get(kind)
}

/// Authoritative wire layout for new payloads of this kind
pub fn default_layout(kind: ResourceKind) -> WireLayout {
    kind_def(kind).layout
}

/// Result tag the server uses for this kind
pub fn result_kind(kind: ResourceKind) -> &'static str {
    &kind_def(kind).result_kind
}

/// Default timeout hint, only for HTTP-shaped API kinds
pub fn default_timeout_ms(kind: ResourceKind) -> Option<u64> {
    kind_def(kind).default_timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_every_kind() {
        let registry = get_registry();
        assert_eq!(registry.iter().count(), ResourceKind::ALL.len());
        for (kind, def) in registry.iter() {
            assert_eq!(def.category, kind.category());
            assert!(!def.display_name.is_empty());
        }
    }

    #[test]
    fn test_multi_operation_kinds() {
        let cosmos = kind_def(ResourceKind::CosmosDb);
        for op in ["query", "read", "create", "replace", "upsert", "delete", "patch"] {
            assert!(cosmos.allows_operation(op), "cosmosdb should allow {op}");
        }
        assert!(!cosmos.allows_operation("execute"));

        let snowflake = kind_def(ResourceKind::Snowflake);
        assert_eq!(snowflake.operations, vec!["execute", "status", "cancel"]);

        assert!(kind_def(ResourceKind::Postgres).operations.is_empty());
    }

    #[test]
    fn test_default_timeouts_only_for_http_apis() {
        for kind in [
            ResourceKind::Custom,
            ResourceKind::HubSpot,
            ResourceKind::Salesforce,
            ResourceKind::GoogleSheets,
            ResourceKind::Outreach,
            ResourceKind::Slack,
            ResourceKind::GraphQl,
        ] {
            assert_eq!(default_timeout_ms(kind), Some(30000), "{kind}");
        }
        for kind in [
            ResourceKind::Postgres,
            ResourceKind::Mssql,
            ResourceKind::DynamoDb,
            ResourceKind::CosmosDb,
            ResourceKind::Neo4j,
        ] {
            assert_eq!(default_timeout_ms(kind), None, "{kind}");
        }
    }

    #[test]
    fn test_result_kinds() {
        assert_eq!(result_kind(ResourceKind::Postgres), "database");
        assert_eq!(result_kind(ResourceKind::S3), "storage");
        assert_eq!(result_kind(ResourceKind::HubSpot), "api");
        assert_eq!(result_kind(ResourceKind::CosmosDb), "cosmosdb");
    }
}
