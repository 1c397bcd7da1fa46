use std::sync::Arc;

use crate::core::client::archive_client::ArchiveTransport;
use crate::core::config::ArchiveConfig;
use crate::core::metadata::TelemetryMetadata;
use crate::domain::history::service::HistoricalTelemetryProvider;

#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoricalTelemetryProvider>,
}

pub fn build_app_state(
    config: &ArchiveConfig,
    transport: Arc<dyn ArchiveTransport>,
    metadata: Arc<dyn TelemetryMetadata>,
) -> AppState {
    AppState {
        history: Arc::new(HistoricalTelemetryProvider::from_config(config, transport, metadata)),
    }
}
