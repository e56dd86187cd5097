//! Wire layout generations
//!
//! The same logical payload has two encodings on the wire:
//!
//! - **flat**: kind-specific fields sit next to `type`/`subtype`
//!   (`{ "type": "database", "subtype": "postgresql", "sql": "..." }`)
//! - **embedded**: kind-specific fields are nested under a key named after the
//!   subtype (`{ "type": "database", "subtype": "postgresql", "postgresql": { "sql": "..." } }`)
//!
//! This module only moves fields around. It never changes their values.

use super::kind::ResourceKind;
use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

const TYPE_KEY: &str = "type";
const SUBTYPE_KEY: &str = "subtype";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireLayout {
    Flat,
    Embedded,
}

impl WireLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            WireLayout::Flat => "flat",
            WireLayout::Embedded => "embedded",
        }
    }
}

impl fmt::Display for WireLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(WireLayout::Flat),
            "embedded" => Ok(WireLayout::Embedded),
            other => Err(format!("unknown wire layout '{}' (expected flat or embedded)", other)),
        }
    }
}

/// Build a wire payload from kind-specific fields.
///
/// `type` and `subtype` always come from `kind`; same-named entries in
/// `fields` are ignored.
pub fn encode(kind: ResourceKind, layout: WireLayout, mut fields: Map<String, Value>) -> Value {
    fields.remove(TYPE_KEY);
    fields.remove(SUBTYPE_KEY);

    let mut root = Map::new();
    root.insert(TYPE_KEY.to_string(), Value::String(kind.category().as_str().to_string()));
    root.insert(SUBTYPE_KEY.to_string(), Value::String(kind.as_str().to_string()));

    match layout {
        WireLayout::Flat => root.extend(fields),
        WireLayout::Embedded => {
            root.insert(kind.as_str().to_string(), Value::Object(fields));
        },
    }

    Value::Object(root)
}

/// A wire payload split back into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub kind: ResourceKind,
    pub layout: WireLayout,
    pub fields: Map<String, Value>,
}

/// Detect the layout of a wire payload and pull out its kind-specific fields
pub fn decode(value: &Value) -> Result<Decoded> {
    let Some(root) = value.as_object() else {
        return Err(ResourceError::Decode("payload must be a JSON object".to_string()));
    };

    let subtype = root
        .get(SUBTYPE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::Decode("payload has no subtype".to_string()))?;
    let kind: ResourceKind = subtype.parse()?;

    if let Some(declared) = root.get(TYPE_KEY) {
        if declared.as_str() != Some(kind.category().as_str()) {
            return Err(ResourceError::Decode(format!(
                "payload type {} does not match subtype {}",
                declared, kind
            )));
        }
    }

    if let Some(Value::Object(inner)) = root.get(kind.as_str()) {
        let stray: Vec<&String> = root
            .keys()
            .filter(|k| *k != TYPE_KEY && *k != SUBTYPE_KEY && *k != kind.as_str())
            .collect();
        if !stray.is_empty() {
            return Err(ResourceError::Decode(format!(
                "embedded {} payload also carries flat fields {:?}",
                kind, stray
            )));
        }

        return Ok(Decoded {
            kind,
            layout: WireLayout::Embedded,
            fields: inner.clone(),
        });
    }

    let fields = root
        .iter()
        .filter(|(k, _)| *k != TYPE_KEY && *k != SUBTYPE_KEY)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(Decoded {
        kind,
        layout: WireLayout::Flat,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql_fields() -> Map<String, Value> {
        let Value::Object(map) = json!({ "sql": "SELECT 1", "timeoutMs": 500 }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_encode_flat() {
        let wire = encode(ResourceKind::Postgres, WireLayout::Flat, sql_fields());
        assert_eq!(
            wire,
            json!({ "type": "database", "subtype": "postgresql", "sql": "SELECT 1", "timeoutMs": 500 })
        );
    }

    #[test]
    fn test_encode_embedded() {
        let wire = encode(ResourceKind::Postgres, WireLayout::Embedded, sql_fields());
        assert_eq!(
            wire,
            json!({
                "type": "database",
                "subtype": "postgresql",
                "postgresql": { "sql": "SELECT 1", "timeoutMs": 500 }
            })
        );
    }

    #[test]
    fn test_encode_ignores_caller_type_fields() {
        let mut fields = sql_fields();
        fields.insert("type".to_string(), json!("storage"));
        let wire = encode(ResourceKind::Postgres, WireLayout::Flat, fields);
        assert_eq!(wire["type"], "database");
    }

    #[test]
    fn test_decode_detects_both_generations() {
        for layout in [WireLayout::Flat, WireLayout::Embedded] {
            let wire = encode(ResourceKind::Mssql, layout, sql_fields());
            let decoded = decode(&wire).unwrap();
            assert_eq!(decoded.kind, ResourceKind::Mssql);
            assert_eq!(decoded.layout, layout);
            assert_eq!(decoded.fields, sql_fields());
        }
    }

    #[test]
    fn test_decode_rejects_mixed_layout() {
        let wire = json!({
            "type": "database",
            "subtype": "postgresql",
            "sql": "SELECT 2",
            "postgresql": { "sql": "SELECT 1" }
        });
        assert!(matches!(decode(&wire), Err(ResourceError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_inconsistent_type() {
        let wire = json!({ "type": "api", "subtype": "postgresql", "sql": "SELECT 1" });
        assert!(decode(&wire).is_err());
    }

    #[test]
    fn test_decode_unknown_subtype() {
        let wire = json!({ "type": "database", "subtype": "oracle" });
        assert!(matches!(decode(&wire), Err(ResourceError::UnsupportedSubtype { .. })));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("Embedded".parse::<WireLayout>().unwrap(), WireLayout::Embedded);
        assert!("nested".parse::<WireLayout>().is_err());
    }
}
