use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entity::EntityClass;
use super::query_options::SortOrder;

/// How the archive interprets the size parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeType {
    /// Maximum number of records per page.
    Limit,
    /// Number of bins on the samples endpoint.
    Count,
}

impl SizeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeType::Limit => "limit",
            SizeType::Count => "count",
        }
    }
}

/// Canonical, planner-produced description of one archive query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub entity_class: EntityClass,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub size_type: SizeType,
    pub size: usize,
    pub total_request_size: usize,
    pub order: SortOrder,
    pub is_samples: bool,
    pub response_key_name: &'static str,
}
