pub mod archive_pager;
pub mod history_service;
pub mod point_converter;
pub mod query_planner;
pub mod request_composer;
pub mod response_accumulator;
pub mod stream_dispatcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use history_service::{HistoricalTelemetryProvider, QueryPlan};
pub use stream_dispatcher::StreamSummary;
