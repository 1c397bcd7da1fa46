use serde::Deserialize;
use validator::Validate;

use crate::domain::history::model::{QueryOptions, SortOrder, Strategy, TelemetryEntity};
use crate::errors::AppError;

/// Query string of `GET /api/v1/history/{key}`. Times are epoch milliseconds.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HistoryQueryDto {
    #[validate(length(min = 1))]
    pub kind: String,
    #[validate(range(min = 0))]
    pub start: i64,
    #[validate(range(min = 0))]
    pub end: i64,
    /// Zero means "no size", like leaving it out.
    pub size: Option<usize>,
    pub strategy: Option<String>,
    pub order: Option<String>,
}

impl HistoryQueryDto {
    pub fn entity(&self, key: &str) -> TelemetryEntity {
        TelemetryEntity {
            key: key.to_string(),
            kind: self.kind.clone(),
        }
    }

    /// Validated domain options. An unknown strategy means "none"; an unknown
    /// order is rejected.
    pub fn to_options(&self) -> Result<QueryOptions, AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut options = QueryOptions::from_millis(self.start, self.end)
            .ok_or_else(|| AppError::BadRequest("start/end out of range".into()))?;
        options.size = self.size;
        options.strategy = self.strategy.as_deref().and_then(Strategy::from_code);

        if let Some(code) = self.order.as_deref() {
            let order = SortOrder::from_code(code)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown order: {}", code)))?;
            options = options.with_order(order);
        }

        Ok(options)
    }
}
