use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::client::archive_client::ArchiveTransport;
use crate::domain::history::dto::archive_page::ArchivePage;
use crate::domain::history::model::{RequestDescriptor, WireTarget};
use crate::errors::HistoryError;

/// Sequential walk over the pages of one query.
///
/// Each page URL depends on the previous page's continuation token, so pages
/// are only ever fetched one after another.
pub struct ArchivePager<'a> {
    transport: &'a dyn ArchiveTransport,
    target: &'a WireTarget,
    descriptor: &'a RequestDescriptor,
    cancel: &'a CancellationToken,
    continuation: Option<String>,
    fetched: usize,
    pages: usize,
    done: bool,
}

impl<'a> ArchivePager<'a> {
    pub fn new(
        transport: &'a dyn ArchiveTransport,
        target: &'a WireTarget,
        descriptor: &'a RequestDescriptor,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            transport,
            target,
            descriptor,
            cancel,
            continuation: None,
            fetched: 0,
            pages: 0,
            done: false,
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetches the next page, or `None` once the archive has no more data or
    /// the record budget is spent. A fired token is reported before any
    /// fetch is issued.
    pub async fn next_page(&mut self) -> Result<Option<ArchivePage>, HistoryError> {
        if self.done {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            debug!("History request cancelled after {} page(s)", self.pages);
            return Err(HistoryError::Cancelled);
        }

        let url = self.target.page_url(self.continuation.as_deref());
        let payload = self.transport.fetch_page(&url, self.cancel).await?;
        let page = ArchivePage::from_payload(payload, self.descriptor.response_key_name);

        self.pages += 1;
        self.fetched += page.len();
        self.continuation = page.continuation_token.clone();

        if self.continuation.is_none() || self.fetched >= self.descriptor.total_request_size {
            self.done = true;
        }

        debug!(
            "Fetched page {} with {} record(s), {} total",
            self.pages,
            page.len(),
            self.fetched
        );
        Ok(Some(page))
    }
}
