use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::client::archive_client::ArchiveTransport;
use crate::domain::history::model::{CanonicalPoint, RequestDescriptor, WireTarget};
use crate::errors::HistoryError;

use super::archive_pager::ArchivePager;
use super::point_converter::PointConverter;

/// Batch mode: collects every page first, converts once at the end.
#[derive(Clone)]
pub struct ResponseAccumulator {
    transport: Arc<dyn ArchiveTransport>,
}

impl ResponseAccumulator {
    pub fn new(transport: Arc<dyn ArchiveTransport>) -> Self {
        Self { transport }
    }

    /// Raw records of every page, concatenated in archive order.
    pub async fn accumulate(
        &self,
        target: &WireTarget,
        descriptor: &RequestDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>, HistoryError> {
        let mut pager = ArchivePager::new(self.transport.as_ref(), target, descriptor, cancel);
        let mut records = Vec::new();

        while let Some(page) = pager.next_page().await? {
            records.extend(page.records);
        }

        debug!(
            "Accumulated {} record(s) over {} page(s)",
            records.len(),
            pager.pages()
        );
        Ok(records)
    }

    pub async fn fetch(
        &self,
        target: &WireTarget,
        descriptor: &RequestDescriptor,
        converter: &PointConverter,
        cancel: &CancellationToken,
    ) -> Result<Vec<CanonicalPoint>, HistoryError> {
        let records = self.accumulate(target, descriptor, cancel).await?;
        Ok(converter.convert(Some(&records)))
    }
}
