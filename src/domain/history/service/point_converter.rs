use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::history::dto::command_dto::CommandAttributeDto;
use crate::domain::history::dto::parameter_value_dto::{LimitSource, ParameterValueDto, SampleDto};
use crate::domain::history::dto::value_dto::{AggregateValueDto, ValueDto, ValueType};
use crate::domain::history::model::{CanonicalPoint, EntityClass, RequestDescriptor};

/// Time field of raw parameter, event and command records.
pub const GENERATION_TIME_KEY: &str = "generationTime";
const COMMAND_ATTRIBUTES_KEY: &str = "attr";

/// Decodes archive records of one query into canonical points.
#[derive(Debug, Clone)]
pub struct PointConverter {
    entity_class: EntityClass,
    is_samples: bool,
    entity_key: String,
}

impl PointConverter {
    pub fn new(entity_key: impl Into<String>, entity_class: EntityClass, is_samples: bool) -> Self {
        Self {
            entity_class,
            is_samples,
            entity_key: entity_key.into(),
        }
    }

    pub fn for_request(entity_key: impl Into<String>, descriptor: &RequestDescriptor) -> Self {
        Self::new(entity_key, descriptor.entity_class, descriptor.is_samples)
    }

    /// Never fails: no records means no points, and records that cannot be
    /// decoded are dropped with a warning.
    pub fn convert(&self, records: Option<&[Value]>) -> Vec<CanonicalPoint> {
        let Some(records) = records else {
            return Vec::new();
        };

        let mut points = Vec::with_capacity(records.len());
        for record in records {
            match (self.entity_class, self.is_samples) {
                (EntityClass::Event, _) => points.extend(self.convert_event(record)),
                (EntityClass::Command, _) => points.extend(self.convert_command(record)),
                (EntityClass::Parameter, false) => points.extend(self.convert_parameter(record)),
                (EntityClass::Parameter, true) => self.convert_sample(record, &mut points),
            }
        }
        points
    }

    fn convert_event(&self, record: &Value) -> Option<CanonicalPoint> {
        let Some(obj) = record.as_object() else {
            warn!("Skipping event record that is not an object");
            return None;
        };
        let timestamp = generation_time(obj)?;

        let mut point = CanonicalPoint::new(self.entity_key.clone(), timestamp);
        for (key, value) in obj {
            if key == GENERATION_TIME_KEY {
                continue;
            }
            point.insert_field(key.clone(), value.clone());
        }
        Some(point)
    }

    fn convert_command(&self, record: &Value) -> Option<CanonicalPoint> {
        let Some(obj) = record.as_object() else {
            warn!("Skipping command record that is not an object");
            return None;
        };
        let timestamp = generation_time(obj)?;

        let mut point = CanonicalPoint::new(self.entity_key.clone(), timestamp);
        for (key, value) in obj {
            match key.as_str() {
                GENERATION_TIME_KEY | COMMAND_ATTRIBUTES_KEY => {}
                "id" => {
                    point.insert_field("commandId", value.clone());
                }
                _ => {
                    point.insert_field(key.clone(), value.clone());
                }
            }
        }

        // command status (acknowledgements, completion) lives in attr[]
        if let Some(Value::Array(attrs)) = obj.get(COMMAND_ATTRIBUTES_KEY) {
            for attr in attrs {
                match serde_json::from_value::<CommandAttributeDto>(attr.clone()) {
                    Ok(a) => {
                        point.insert_field(a.name, decode_value(&a.value));
                    }
                    Err(e) => warn!("Skipping malformed command attribute: {}", e),
                }
            }
        }

        Some(point)
    }

    fn convert_parameter(&self, record: &Value) -> Option<CanonicalPoint> {
        let pv: ParameterValueDto = match serde_json::from_value(record.clone()) {
            Ok(pv) => pv,
            Err(e) => {
                warn!("Skipping malformed parameter record for {}: {}", self.entity_key, e);
                return None;
            }
        };

        let mut point = CanonicalPoint::new(pv.id.name.clone(), pv.generation_time);

        match pv.value() {
            Some(value) if value.value_type == ValueType::Aggregate => {
                let mut flat = Map::new();
                if let Some(agg) = &value.aggregate_value {
                    flatten_aggregate(None, agg, &mut flat);
                }
                for (key, member) in flat {
                    point.insert_field(key, member);
                }
            }
            Some(value) => point.value = Some(decode_value(value)),
            None => point.value = Some(Value::Null),
        }

        point.limit = pv.limit_info();
        Some(point)
    }

    fn convert_sample(&self, record: &Value, out: &mut Vec<CanonicalPoint>) {
        let sample: SampleDto = match serde_json::from_value(record.clone()) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping malformed sample for {}: {}", self.entity_key, e);
                return;
            }
        };

        if sample.n > 0 {
            let mut min = CanonicalPoint::new(self.entity_key.clone(), sample.time)
                .with_value(Value::from(sample.min));
            min.limit = sample.limit_info();
            out.push(min);
        }

        if sample.n > 1 {
            let mut max = CanonicalPoint::new(self.entity_key.clone(), sample.time)
                .with_value(Value::from(sample.max));
            max.limit = sample.limit_info();
            out.push(max);
        }
    }
}

fn generation_time(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let parsed = obj
        .get(GENERATION_TIME_KEY)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<DateTime<Utc>>().ok());

    if parsed.is_none() {
        warn!("Skipping record without a valid {}", GENERATION_TIME_KEY);
    }
    parsed
}

/// JSON form of an archive value. Aggregates become nested objects here;
/// top-level parameter aggregates are flattened by the converter instead.
pub fn decode_value(v: &ValueDto) -> Value {
    let decoded = match v.value_type {
        ValueType::Float => v.float_value.map(Value::from),
        ValueType::Double => v.double_value.map(Value::from),
        ValueType::Uint32 => v.uint32_value.map(Value::from),
        ValueType::Sint32 => v.sint32_value.map(Value::from),
        ValueType::Uint64 => v.uint64_value.map(Value::from),
        ValueType::Sint64 => v.sint64_value.map(Value::from),
        ValueType::Boolean => v.boolean_value.map(Value::from),
        ValueType::String | ValueType::Enumerated => v.string_value.clone().map(Value::from),
        ValueType::Binary => v.binary_value.clone().map(Value::from),
        ValueType::Timestamp => v.string_value.clone().map(Value::from).or_else(|| {
            v.timestamp_value
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|ts| Value::from(ts.to_rfc3339()))
        }),
        ValueType::Aggregate => v.aggregate_value.as_ref().map(|agg| {
            let members = agg
                .name
                .iter()
                .zip(&agg.value)
                .map(|(name, member)| (name.clone(), decode_value(member)))
                .collect::<Map<String, Value>>();
            Value::Object(members)
        }),
        ValueType::Array => v
            .array_value
            .as_ref()
            .map(|items| Value::Array(items.iter().map(decode_value).collect())),
        ValueType::Unknown => v.string_value.clone().map(Value::from),
    };

    decoded.unwrap_or(Value::Null)
}

/// Writes aggregate members into `out`; nested aggregates use dotted keys.
pub fn flatten_aggregate(
    prefix: Option<&str>,
    agg: &AggregateValueDto,
    out: &mut Map<String, Value>,
) {
    for (name, member) in agg.name.iter().zip(&agg.value) {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, name),
            None => name.clone(),
        };

        match (&member.value_type, &member.aggregate_value) {
            (ValueType::Aggregate, Some(nested)) => flatten_aggregate(Some(&key), nested, out),
            _ => {
                out.insert(key, decode_value(member));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: Value) -> Vec<Value> {
        v.as_array().cloned().unwrap()
    }

    #[test]
    fn absent_or_empty_input_is_empty_for_every_class() {
        for (class, samples) in [
            (EntityClass::Parameter, false),
            (EntityClass::Parameter, true),
            (EntityClass::Event, false),
            (EntityClass::Command, false),
        ] {
            let converter = PointConverter::new("k", class, samples);
            assert!(converter.convert(None).is_empty());
            assert!(converter.convert(Some(&[])).is_empty());
        }
    }

    #[test]
    fn scalar_parameter_gets_value_and_limits() {
        let converter = PointConverter::new("~sat~voltage", EntityClass::Parameter, false);
        let input = records(json!([
            {
                "id": {"name": "/sat/voltage"},
                "generationTime": "2024-03-01T10:00:00.000Z",
                "engValue": {"type": "DOUBLE", "doubleValue": 28.4},
                "monitoringResult": "WARNING",
                "rangeCondition": "HIGH",
                "alarmRange": [{"level": "WATCH", "minInclusive": 20.0, "maxInclusive": 28.0}]
            },
            {
                "id": {"name": "/sat/voltage"},
                "generationTime": "2024-03-01T10:00:01.000Z",
                "engValue": {"type": "UINT64", "uint64Value": "18446744073709551615"}
            }
        ]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 2);

        assert_eq!(points[0].id, "/sat/voltage");
        assert_eq!(points[0].value, Some(json!(28.4)));
        let limit = points[0].limit.as_ref().unwrap();
        assert_eq!(limit.range_condition.as_deref(), Some("HIGH"));
        assert_eq!(limit.alarm_range.len(), 1);

        assert_eq!(points[1].value, Some(json!(u64::MAX)));
        assert!(points[1].limit.is_none());
    }

    #[test]
    fn aggregate_parameter_is_flattened_into_point() {
        let converter = PointConverter::new("~sat~attitude", EntityClass::Parameter, false);
        let input = records(json!([{
            "id": {"name": "/sat/attitude"},
            "generationTime": "2024-03-01T10:00:00.000Z",
            "engValue": {
                "type": "AGGREGATE",
                "aggregateValue": {
                    "name": ["roll", "pitch", "quat"],
                    "value": [
                        {"type": "FLOAT", "floatValue": 0.5},
                        {"type": "FLOAT", "floatValue": -1.0},
                        {"type": "AGGREGATE", "aggregateValue": {
                            "name": ["w", "x"],
                            "value": [
                                {"type": "DOUBLE", "doubleValue": 1.0},
                                {"type": "DOUBLE", "doubleValue": 0.0}
                            ]
                        }}
                    ]
                }
            }
        }]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.value, None);
        assert_eq!(p.field("roll"), Some(&json!(0.5)));
        assert_eq!(p.field("pitch"), Some(&json!(-1.0)));
        assert_eq!(p.field("quat.w"), Some(&json!(1.0)));
        assert_eq!(p.field("quat.x"), Some(&json!(0.0)));

        let serialized = serde_json::to_value(p).unwrap();
        assert!(serialized.get("value").is_none());
        assert_eq!(serialized["roll"], 0.5);
    }

    #[test]
    fn enumerated_and_array_values_decode() {
        let enumerated: ValueDto = serde_json::from_value(json!({
            "type": "ENUMERATED",
            "sint64Value": "2",
            "stringValue": "SAFE"
        }))
        .unwrap();
        assert_eq!(decode_value(&enumerated), json!("SAFE"));

        let array: ValueDto = serde_json::from_value(json!({
            "type": "ARRAY",
            "arrayValue": [
                {"type": "SINT32", "sint32Value": 1},
                {"type": "BOOLEAN", "booleanValue": true}
            ]
        }))
        .unwrap();
        assert_eq!(decode_value(&array), json!([1, true]));
    }

    #[test]
    fn samples_emit_min_and_max_by_count() {
        let converter = PointConverter::new("~sat~voltage", EntityClass::Parameter, true);
        let input = records(json!([
            {"time": "2024-03-01T10:00:00Z", "n": 0},
            {"time": "2024-03-01T10:01:00Z", "min": 1.0, "max": 1.0, "avg": 1.0, "n": 1},
            {"time": "2024-03-01T10:02:00Z", "min": 2.0, "max": 5.0, "avg": 3.0, "n": 2}
        ]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].value, Some(json!(1.0)));
        assert_eq!(points[0].timestamp.to_rfc3339(), "2024-03-01T10:01:00+00:00");

        assert_eq!(points[1].value, Some(json!(2.0)));
        assert_eq!(points[2].value, Some(json!(5.0)));
        assert_eq!(points[1].timestamp, points[2].timestamp);
        assert!(points.iter().all(|p| p.id == "~sat~voltage"));
    }

    #[test]
    fn events_carry_fields_verbatim() {
        let converter = PointConverter::new("events", EntityClass::Event, false);
        let input = records(json!([{
            "generationTime": "2024-03-01T10:00:00.000Z",
            "receptionTime": "2024-03-01T10:00:00.200Z",
            "message": "Battery low",
            "severity": "WARNING",
            "source": "EPS",
            "seqNumber": 17
        }]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.id, "events");
        assert_eq!(p.field("message"), Some(&json!("Battery low")));
        assert_eq!(p.field("severity"), Some(&json!("WARNING")));
        assert_eq!(p.field("seqNumber"), Some(&json!(17)));
        assert!(p.field(GENERATION_TIME_KEY).is_none());
        assert!(p.value.is_none());
    }

    #[test]
    fn commands_flatten_attributes() {
        let converter = PointConverter::new("commands", EntityClass::Command, false);
        let input = records(json!([{
            "id": "1709287200000-operator-3",
            "commandName": "/sat/PING",
            "origin": "operator",
            "sequenceNumber": 3,
            "generationTime": "2024-03-01T10:00:00.000Z",
            "assignments": [{"name": "count", "value": {"type": "UINT32", "uint32Value": 2}}],
            "attr": [
                {
                    "name": "Acknowledge_Sent_Status",
                    "value": {"type": "STRING", "stringValue": "OK"}
                },
                {
                    "name": "CommandComplete_Status",
                    "value": {"type": "STRING", "stringValue": "OK"}
                },
                {"name": "broken"}
            ]
        }]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.id, "commands");
        assert_eq!(p.field("commandId"), Some(&json!("1709287200000-operator-3")));
        assert_eq!(p.field("commandName"), Some(&json!("/sat/PING")));
        assert_eq!(p.field("CommandComplete_Status"), Some(&json!("OK")));
        assert!(p.field("assignments").is_some());
        assert!(p.field("attr").is_none());
        assert!(p.field("broken").is_none());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let converter = PointConverter::new("~sat~voltage", EntityClass::Parameter, false);
        let input = records(json!([
            {"id": {"name": "/sat/voltage"}},
            "garbage",
            {
                "id": {"name": "/sat/voltage"},
                "generationTime": "2024-03-01T10:00:00.000Z",
                "engValue": {"type": "SINT32", "sint32Value": -4}
            }
        ]));

        let points = converter.convert(Some(&input));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, Some(json!(-4)));
    }
}
