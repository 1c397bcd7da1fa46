use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One alarm band of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRange {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<f64>,
}

/// Alarm/threshold state attached next to a point's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_condition: Option<String>,
    pub alarm_range: Vec<AlarmRange>,
}

/// Normalized record, independent of the archive shape it came from.
///
/// Serializes flat: `fields` and `limit` are merged next to `id`,
/// `timestamp` and `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPoint {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(flatten)]
    pub limit: Option<LimitInfo>,
}

impl CanonicalPoint {
    pub const RESERVED_KEYS: [&'static str; 3] = ["id", "timestamp", "value"];

    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            value: None,
            fields: Map::new(),
            limit: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds a flattened field. Reserved keys are refused so merged data can
    /// never shadow the point's identity.
    pub fn insert_field(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if Self::RESERVED_KEYS.contains(&key.as_str()) {
            return false;
        }
        self.fields.insert(key, value);
        true
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat_with_limit_info() {
        let ts = DateTime::from_timestamp_millis(0).unwrap();
        let mut point = CanonicalPoint::new("voltage", ts).with_value(json!(3.3));
        point.insert_field("unit", json!("V"));
        point.limit = Some(LimitInfo {
            monitoring_result: Some("WARNING".into()),
            range_condition: Some("HIGH".into()),
            alarm_range: vec![],
        });

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["id"], "voltage");
        assert_eq!(value["value"], 3.3);
        assert_eq!(value["unit"], "V");
        assert_eq!(value["monitoringResult"], "WARNING");
        assert_eq!(value["rangeCondition"], "HIGH");
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn reserved_keys_are_not_merged() {
        let ts = DateTime::from_timestamp_millis(0).unwrap();
        let mut point = CanonicalPoint::new("voltage", ts);
        assert!(!point.insert_field("timestamp", json!("bogus")));
        assert!(!point.insert_field("id", json!("bogus")));
        assert!(point.fields.is_empty());
    }
}
