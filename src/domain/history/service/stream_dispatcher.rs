use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::client::archive_client::ArchiveTransport;
use crate::domain::history::model::{CanonicalPoint, RequestDescriptor, WireTarget};
use crate::errors::HistoryError;

use super::archive_pager::ArchivePager;
use super::point_converter::PointConverter;

/// What a finished stream delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub batches: usize,
    pub points: usize,
}

/// Streaming mode: every page is converted and handed over as soon as it
/// arrives.
#[derive(Clone)]
pub struct StreamDispatcher {
    transport: Arc<dyn ArchiveTransport>,
}

impl StreamDispatcher {
    pub fn new(transport: Arc<dyn ArchiveTransport>) -> Self {
        Self { transport }
    }

    /// One converted batch per archive page. Pages that convert to nothing
    /// are skipped; the stream ends with `Err(Cancelled)` if the token fires
    /// between pages.
    pub fn batches<'a>(
        &'a self,
        target: &'a WireTarget,
        descriptor: &'a RequestDescriptor,
        converter: &'a PointConverter,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = Result<Vec<CanonicalPoint>, HistoryError>> + Send + 'a {
        let pager = ArchivePager::new(self.transport.as_ref(), target, descriptor, cancel);

        stream::try_unfold(pager, move |mut pager| async move {
            let next = pager.next_page().await?;
            Ok::<_, HistoryError>(next.map(|page| (converter.convert(Some(&page.records)), pager)))
        })
        .try_filter(|batch| futures::future::ready(!batch.is_empty()))
    }

    pub async fn stream<F>(
        &self,
        target: &WireTarget,
        descriptor: &RequestDescriptor,
        converter: &PointConverter,
        mut on_batch: F,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, HistoryError>
    where
        F: FnMut(Vec<CanonicalPoint>) + Send,
    {
        let mut summary = StreamSummary::default();
        let batches = self.batches(target, descriptor, converter, cancel);
        futures::pin_mut!(batches);

        while let Some(batch) = batches.try_next().await? {
            summary.batches += 1;
            summary.points += batch.len();
            on_batch(batch);
        }

        debug!(
            "Streamed {} point(s) in {} batch(es)",
            summary.points, summary.batches
        );
        Ok(summary)
    }
}
