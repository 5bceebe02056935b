//! Record ingestion: flat JSON objects with typed, defensive field access.
//!
//! Records arrive fully materialized from whatever query layer produced them.
//! Missing or mistyped fields are treated as absent values rather than
//! errors; the only hard failures here are unreadable or unparseable input
//! files.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::model::NodeId;

/// One row of queried data. Only the fields named by the caller's
/// [`GraphOptions`](crate::config::GraphOptions) are ever inspected.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read records file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse records file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Records file must contain a JSON array of objects")]
    NotAnArray,
}

/// Load an array of records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()),
        _ => Err(RecordError::NotAnArray),
    }
}

/// Look up a named field, treating an unconfigured field name as absent.
pub fn field<'a>(record: &'a Record, name: Option<&str>) -> Option<&'a Value> {
    name.and_then(|n| record.get(n))
}

/// Normalize a raw value into a node identifier. Empty strings, zero,
/// null, and missing values all count as "no id" and skip the record.
pub fn id_value(value: Option<&Value>) -> Option<NodeId> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(NodeId::new(s.clone())),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(NodeId::new(n.to_string()))
            }
        }
        _ => None,
    }
}

/// Extract a non-empty display string.
pub fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a numeric weight.
pub fn number_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Collapse a value to a boolean flag using truthiness: null, false, zero,
/// and the empty string are all false.
pub fn bool_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Parse an event date from an RFC 3339 string or an epoch-millisecond
/// number. Anything else is a dateless occurrence.
pub fn date_value(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Normalize a scalar-or-array field into a list of values. A scalar
/// becomes a single-element list; a missing field becomes an empty one.
pub fn array_values(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_id_value_skips_falsy() {
        assert_eq!(id_value(Some(&json!(""))), None);
        assert_eq!(id_value(Some(&json!(0))), None);
        assert_eq!(id_value(Some(&json!(null))), None);
        assert_eq!(id_value(None), None);
        assert_eq!(id_value(Some(&json!("a"))), Some(NodeId::new("a")));
        assert_eq!(id_value(Some(&json!(42))), Some(NodeId::new("42")));
    }

    #[test]
    fn test_bool_value_truthiness() {
        assert!(!bool_value(Some(&json!(false))));
        assert!(!bool_value(Some(&json!(0))));
        assert!(!bool_value(Some(&json!(""))));
        assert!(!bool_value(None));
        assert!(bool_value(Some(&json!(true))));
        assert!(bool_value(Some(&json!(1))));
        assert!(bool_value(Some(&json!("yes"))));
    }

    #[test]
    fn test_date_value_formats() {
        let rfc = date_value(Some(&json!("2024-03-01T12:00:00Z"))).unwrap();
        assert_eq!(rfc.timestamp(), 1_709_294_400);

        let epoch = date_value(Some(&json!(1_709_294_400_000i64))).unwrap();
        assert_eq!(epoch, rfc);

        assert_eq!(date_value(Some(&json!("not a date"))), None);
        assert_eq!(date_value(Some(&json!([1, 2]))), None);
    }

    #[test]
    fn test_array_values_normalization() {
        assert_eq!(array_values(Some(&json!(["a", "b"]))).len(), 2);
        assert_eq!(array_values(Some(&json!("a"))), vec![json!("a")]);
        assert!(array_values(Some(&json!(null))).is_empty());
        assert!(array_values(None).is_empty());
    }

    #[test]
    fn test_field_lookup() {
        let r = record(json!({"id": "A", "weight": 3}));
        assert_eq!(field(&r, Some("id")), Some(&json!("A")));
        assert_eq!(field(&r, Some("missing")), None);
        assert_eq!(field(&r, None), None);
        assert_eq!(number_value(field(&r, Some("weight"))), Some(3.0));
    }
}
