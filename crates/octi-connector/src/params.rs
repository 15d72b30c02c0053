//! Operation parameters as handed over by the connector host.

use crate::traits::{ConnectorError, ConnectorResult};
use serde_json::{Map, Value};

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: u64 = 50;

/// Cleaned parameter mapping for a single operation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    /// Builds params from a JSON value, dropping empty and falsy entries.
    ///
    /// Anything other than an object yields empty params.
    pub fn clean(raw: Value) -> Self {
        match raw {
            Value::Object(map) => Self::clean_map(map),
            _ => Self::default(),
        }
    }

    /// Keeps a value when it is `false`, zero, or truthy.
    pub fn clean_map(map: Map<String, Value>) -> Self {
        let values = map.into_iter().filter(|(_, v)| keep(v)).collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Gets a parameter as a string. Numbers and booleans are stringified.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Gets a required parameter as a string.
    pub fn require_str(&self, key: &str) -> ConnectorResult<String> {
        self.get_str(key).ok_or_else(|| {
            ConnectorError::InvalidRequest(format!("Missing required parameter: {}", key))
        })
    }

    /// Gets a non-negative integer, accepting numeric strings.
    pub fn get_u64(&self, key: &str) -> ConnectorResult<Option<u64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| invalid_int(key)),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid_int(key)),
            Some(_) => Err(invalid_int(key)),
        }
    }

    /// Gets a list of strings from an array or a comma-separated string.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Page size, `limit` or 50.
    pub fn limit(&self) -> ConnectorResult<u64> {
        Ok(self.get_u64("limit")?.unwrap_or(DEFAULT_LIMIT))
    }

    /// Cursor to resume listing from, the `end_cursor_id` parameter.
    pub fn after(&self) -> Option<String> {
        self.get_str("end_cursor_id")
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self::clean_map(map)
    }
}

fn keep(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) => true,
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn invalid_int(key: &str) -> ConnectorError {
    ConnectorError::InvalidRequest(format!("Parameter {} must be a non-negative integer", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_drops_empty_values() {
        let params = Params::clean(json!({
            "name": "ACME",
            "description": "",
            "reliability": null,
            "label_id": [],
            "extra": {},
        }));
        assert!(params.contains("name"));
        assert!(!params.contains("description"));
        assert!(!params.contains("reliability"));
        assert!(!params.contains("label_id"));
        assert!(!params.contains("extra"));
    }

    #[test]
    fn test_clean_keeps_false_and_zero() {
        let params = Params::clean(json!({
            "verify": false,
            "score": 0,
            "ratio": 0.0,
            "active": true,
        }));
        assert_eq!(params.get("verify"), Some(&json!(false)));
        assert_eq!(params.get("score"), Some(&json!(0)));
        assert!(params.contains("ratio"));
        assert!(params.contains("active"));
    }

    #[test]
    fn test_clean_non_object() {
        assert_eq!(Params::clean(json!(["a"])), Params::default());
        assert_eq!(Params::clean(Value::Null), Params::default());
    }

    #[test]
    fn test_require_str() {
        let params = Params::clean(json!({"name": 42}));
        assert_eq!(params.require_str("name").unwrap(), "42");
        assert!(matches!(
            params.require_str("url"),
            Err(ConnectorError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_limit_and_cursor() {
        let params = Params::clean(json!({"limit": "10", "end_cursor_id": "YXJyYXljb25uZWN0aW9uOjQ5"}));
        assert_eq!(params.limit().unwrap(), 10);
        assert_eq!(params.after().as_deref(), Some("YXJyYXljb25uZWN0aW9uOjQ5"));

        let defaults = Params::clean(json!({}));
        assert_eq!(defaults.limit().unwrap(), DEFAULT_LIMIT);
        assert_eq!(defaults.after(), None);

        let bad = Params::clean(json!({"limit": -1}));
        assert!(bad.limit().is_err());
    }

    #[test]
    fn test_string_list() {
        let params = Params::clean(json!({"type": ["IPv4", " Domain ", ""], "ids": "a, b,,c"}));
        assert_eq!(params.get_string_list("type"), vec!["IPv4", "Domain"]);
        assert_eq!(params.get_string_list("ids"), vec!["a", "b", "c"]);
        assert!(params.get_string_list("missing").is_empty());
    }
}
