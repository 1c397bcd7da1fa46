use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort direction of an archive query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Query-intent modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Latest,
    MinMax,
}

impl Strategy {
    /// Case-insensitive; anything unrecognized means "no strategy".
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "latest" => Some(Strategy::Latest),
            "minmax" => Some(Strategy::MinMax),
            _ => None,
        }
    }
}

/// Caller input. Never mutated once handed to the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub size: Option<usize>,
    pub strategy: Option<Strategy>,
    pub order: Option<SortOrder>,
}

impl QueryOptions {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            size: None,
            strategy: None,
            order: None,
        }
    }

    /// Builds options from epoch milliseconds, the unit hosts usually carry.
    pub fn from_millis(start_ms: i64, end_ms: i64) -> Option<Self> {
        let start = DateTime::from_timestamp_millis(start_ms)?;
        let end = DateTime::from_timestamp_millis(end_ms)?;
        Some(Self::new(start, end))
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }
}
