//! Extracted parameters
//!
//! When a call site's arguments are not known statically they are captured as
//! source text plus a declared type tag. This module turns those string-encoded
//! parameters back into JSON values.
//!
//! Coercion never fails: a value that does not parse as its declared type is
//! handed back as the raw string, so the server's own validation reports the
//! problem instead of the client aborting the call.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Declared value kind of an extracted parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Object,
    List,
    /// Any tag we don't recognise is treated like a string
    #[serde(other)]
    Unknown,
}

/// A named, string-encoded parameter captured from a call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParam {
    pub name: String,
    pub value: String,
    pub value_type: ValueType,
    /// False when the argument could not be resolved statically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,
    /// Source text of the argument expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl ExtractedParam {
    pub fn new(name: &str, value: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            value_type,
            known: None,
            expression: None,
        }
    }

    /// Mark the parameter as statically unresolved
    pub fn unresolved(mut self, expression: &str) -> Self {
        self.known = Some(false);
        self.expression = Some(expression.to_string());
        self
    }

    /// An unresolved `undefined` expression stands for a missing argument
    fn is_absent(&self) -> bool {
        self.known == Some(false) && self.expression.as_deref() == Some("undefined")
    }

    /// Coerce the string value according to the declared type
    pub fn coerce(&self) -> Option<Value> {
        if self.is_absent() {
            return None;
        }
        Some(coerce_value(&self.value, self.value_type))
    }
}

/// Convert a raw string into a JSON value of the declared type
pub fn coerce_value(raw: &str, value_type: ValueType) -> Value {
    match value_type {
        ValueType::Object | ValueType::List => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        },
        ValueType::Number => parse_number(raw).unwrap_or_else(|| Value::String(raw.to_string())),
        // Strict: only the exact text "true" is true
        ValueType::Boolean => Value::Bool(raw == "true"),
        ValueType::String | ValueType::Unknown => Value::String(raw.to_string()),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::Number(Number::from(int)));
    }

    let float = trimmed.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        return Some(Value::Number(Number::from(float as i64)));
    }
    // NaN and infinities have no JSON representation
    Number::from_f64(float).map(Value::Number)
}

/// Look up a parameter by name (case-insensitive) and coerce it.
///
/// `None` means "undefined": either no parameter has that name, or it was an
/// unresolved `undefined` expression.
pub fn resolve(params: &[ExtractedParam], name: &str) -> Option<Value> {
    let wanted = name.to_lowercase();
    params
        .iter()
        .find(|p| p.name.to_lowercase() == wanted)
        .and_then(ExtractedParam::coerce)
}

/// Case-insensitive lookup table over one call's parameters
///
/// Built once per dispatched call. When names collide the first parameter wins,
/// matching [`resolve`].
pub struct ParamTable<'a> {
    by_name: HashMap<String, &'a ExtractedParam>,
}

impl<'a> ParamTable<'a> {
    pub fn new(params: &'a [ExtractedParam]) -> Self {
        let mut by_name = HashMap::with_capacity(params.len());
        for param in params {
            by_name.entry(param.name.to_lowercase()).or_insert(param);
        }
        Self { by_name }
    }

    /// Coerced value of a parameter, `None` when absent
    pub fn value(&self, name: &str) -> Option<Value> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|p| p.coerce())
    }

    /// Required string argument; a missing value becomes the empty string
    pub fn string(&self, name: &str) -> String {
        self.opt_string(name).unwrap_or_else(|| {
            tracing::debug!("Missing parameter {}, using empty string", name);
            String::new()
        })
    }

    /// Optional string argument. A JSON `null` counts as absent; other
    /// non-string values are rendered as JSON text.
    pub fn opt_string(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Millisecond count; a fractional value is rounded to the nearest millisecond
    pub fn millis(&self, name: &str) -> Option<u64> {
        let value = self.value(name)?;
        let millis = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|ms| ms.is_finite() && *ms >= 0.0)
                .map(|ms| ms.round() as u64)
        });
        if millis.is_none() {
            tracing::warn!("Parameter {} is not a millisecond count: {}", name, value);
        }
        millis
    }

    /// Optional typed argument.
    ///
    /// A value that does not fit `T` is dropped with a warning so the field is
    /// simply omitted from the payload.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.value(name)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Parameter {} does not fit the expected shape: {}", name, e);
                None
            },
        }
    }

    /// Typed argument with a fallback for missing or ill-shaped values
    pub fn decode_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.decode(name).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_string_param_is_absent() {
        let params = vec![
            ExtractedParam::new("Path", "null", ValueType::Object),
            ExtractedParam::new("Query", "null", ValueType::String),
        ];
        let table = ParamTable::new(&params);
        assert_eq!(table.opt_string("path"), None);
        assert_eq!(table.string("Path"), "");
        assert_eq!(table.opt_string("Query").as_deref(), Some("null"));
    }

    #[test]
    fn test_millis_rounds_fractions() {
        let params = vec![
            ExtractedParam::new("Timeout", "5000.5", ValueType::Number),
            ExtractedParam::new("Short", "12.2", ValueType::Number),
            ExtractedParam::new("Whole", "3000", ValueType::Number),
            ExtractedParam::new("Negative", "-1", ValueType::Number),
            ExtractedParam::new("Later", "soon", ValueType::Number),
        ];
        let table = ParamTable::new(&params);
        assert_eq!(table.millis("timeout"), Some(5001));
        assert_eq!(table.millis("Short"), Some(12));
        assert_eq!(table.millis("Whole"), Some(3000));
        assert_eq!(table.millis("Negative"), None);
        assert_eq!(table.millis("Later"), None);
        assert_eq!(table.millis("Missing"), None);
    }

    #[test]
    fn test_number_param_coerces() {
        let params = vec![ExtractedParam::new("Timeout", "5000", ValueType::Number)];
        assert_eq!(resolve(&params, "Timeout"), Some(json!(5000)));
    }

    #[test]
    fn test_fractional_number_param() {
        let params = vec![ExtractedParam::new("Ratio", "0.25", ValueType::Number)];
        assert_eq!(resolve(&params, "ratio"), Some(json!(0.25)));
    }

    #[test]
    fn test_bad_number_falls_back_to_string() {
        let params = vec![ExtractedParam::new("Timeout", "soon", ValueType::Number)];
        assert_eq!(resolve(&params, "Timeout"), Some(json!("soon")));
    }

    #[test]
    fn test_boolean_is_strict() {
        let cases = [("true", true), ("True", false), ("1", false), ("False", false), ("", false)];
        for (raw, expected) in cases {
            let params = vec![ExtractedParam::new("Flag", raw, ValueType::Boolean)];
            assert_eq!(resolve(&params, "Flag"), Some(json!(expected)), "raw={raw:?}");
        }
    }

    #[test]
    fn test_object_param_fallback() {
        let params = vec![ExtractedParam::new("X", "not json", ValueType::Object)];
        assert_eq!(resolve(&params, "X"), Some(json!("not json")));
    }

    #[test]
    fn test_list_param_parses() {
        let params = vec![ExtractedParam::new("Params", r#"[1, "a", null]"#, ValueType::List)];
        assert_eq!(resolve(&params, "params"), Some(json!([1, "a", null])));
    }

    #[test]
    fn test_unresolved_undefined_is_absent() {
        let params = vec![ExtractedParam::new("Y", "", ValueType::String).unresolved("undefined")];
        assert_eq!(resolve(&params, "Y"), None);
    }

    #[test]
    fn test_unresolved_other_expression_keeps_value() {
        let params =
            vec![ExtractedParam::new("Y", "fallback", ValueType::String).unresolved("props.value")];
        assert_eq!(resolve(&params, "Y"), Some(json!("fallback")));
    }

    #[test]
    fn test_missing_param_is_none() {
        let params = vec![ExtractedParam::new("SQL", "SELECT 1", ValueType::String)];
        assert_eq!(resolve(&params, "Params"), None);
    }

    #[test]
    fn test_table_first_duplicate_wins() {
        let params = vec![
            ExtractedParam::new("sql", "SELECT 1", ValueType::String),
            ExtractedParam::new("SQL", "SELECT 2", ValueType::String),
        ];
        let table = ParamTable::new(&params);
        assert_eq!(table.string("Sql"), "SELECT 1");
        assert_eq!(resolve(&params, "SQL"), Some(json!("SELECT 1")));
    }

    #[test]
    fn test_table_decode_drops_ill_shaped_value() {
        let params = vec![ExtractedParam::new("Timeout", "soon", ValueType::Number)];
        let table = ParamTable::new(&params);
        assert_eq!(table.decode::<u64>("Timeout"), None);
        assert_eq!(table.string("Missing"), "");
    }

    #[test]
    fn test_value_type_deserializes_unknown_tag() {
        let param: ExtractedParam = serde_json::from_value(json!({
            "name": "X",
            "value": "1",
            "valueType": "date"
        }))
        .unwrap();
        assert_eq!(param.value_type, ValueType::Unknown);
        assert_eq!(param.coerce(), Some(json!("1")));
    }
}
