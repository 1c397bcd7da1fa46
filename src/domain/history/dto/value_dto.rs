use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Type tag of an archive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Float,
    Double,
    Uint32,
    Sint32,
    Uint64,
    Sint64,
    Boolean,
    String,
    Enumerated,
    Binary,
    Timestamp,
    Aggregate,
    Array,
    #[serde(other)]
    Unknown,
}

/// Typed value as the archive encodes it: a type tag plus one populated
/// `*Value` field. 64-bit integers may arrive as decimal strings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDto {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub float_value: Option<f64>,
    pub double_value: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub uint32_value: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub sint32_value: Option<i32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub uint64_value: Option<u64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub sint64_value: Option<i64>,
    pub boolean_value: Option<bool>,
    pub string_value: Option<String>,
    pub binary_value: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub timestamp_value: Option<i64>,
    pub aggregate_value: Option<AggregateValueDto>,
    pub array_value: Option<Vec<ValueDto>>,
}

/// Parallel name/value lists of an aggregate member set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateValueDto {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub value: Vec<ValueDto>,
}
