use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::history::model::{AlarmRange, LimitInfo};

use super::value_dto::{ValueDto, ValueType};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedObjectIdDto {
    pub name: String,
    pub namespace: Option<String>,
}

/// One raw parameter value from `parameter[]` of an archive page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValueDto {
    pub id: NamedObjectIdDto,
    pub generation_time: DateTime<Utc>,
    pub acquisition_time: Option<DateTime<Utc>>,
    pub eng_value: Option<ValueDto>,
    pub raw_value: Option<ValueDto>,
    pub acquisition_status: Option<String>,
    pub monitoring_result: Option<String>,
    pub range_condition: Option<String>,
    pub alarm_range: Option<Vec<AlarmRange>>,
}

impl ParameterValueDto {
    /// Engineering value, falling back to the raw value when the archive
    /// did not calibrate the parameter.
    pub fn value(&self) -> Option<&ValueDto> {
        self.eng_value.as_ref().or(self.raw_value.as_ref())
    }

    pub fn is_aggregate(&self) -> bool {
        self.value()
            .map(|v| v.value_type == ValueType::Aggregate)
            .unwrap_or(false)
    }
}

/// One min/max bin from `sample[]` of a samples page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDto {
    pub time: DateTime<Utc>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(default)]
    pub n: u64,
    pub min_time: Option<DateTime<Utc>>,
    pub max_time: Option<DateTime<Utc>>,
    pub monitoring_result: Option<String>,
    pub range_condition: Option<String>,
    pub alarm_range: Option<Vec<AlarmRange>>,
}

/// Records that may carry alarm bounds next to their value.
pub trait LimitSource {
    fn monitoring_result(&self) -> Option<&String>;
    fn range_condition(&self) -> Option<&String>;
    fn alarm_range(&self) -> Option<&Vec<AlarmRange>>;

    /// Limit info exists only when the record has an alarm range.
    fn limit_info(&self) -> Option<LimitInfo> {
        self.alarm_range().map(|ranges| LimitInfo {
            monitoring_result: self.monitoring_result().cloned(),
            range_condition: self.range_condition().cloned(),
            alarm_range: ranges.clone(),
        })
    }
}

impl LimitSource for ParameterValueDto {
    fn monitoring_result(&self) -> Option<&String> {
        self.monitoring_result.as_ref()
    }

    fn range_condition(&self) -> Option<&String> {
        self.range_condition.as_ref()
    }

    fn alarm_range(&self) -> Option<&Vec<AlarmRange>> {
        self.alarm_range.as_ref()
    }
}

impl LimitSource for SampleDto {
    fn monitoring_result(&self) -> Option<&String> {
        self.monitoring_result.as_ref()
    }

    fn range_condition(&self) -> Option<&String> {
        self.range_condition.as_ref()
    }

    fn alarm_range(&self) -> Option<&Vec<AlarmRange>> {
        self.alarm_range.as_ref()
    }
}
