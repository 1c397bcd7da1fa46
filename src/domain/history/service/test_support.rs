use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::core::client::archive_client::ArchiveTransport;
use crate::errors::TransportError;

/// Transport answering from a fixed list of pages and recording every URL.
pub struct ScriptedTransport {
    pages: Mutex<VecDeque<Value>>,
    urls: Mutex<Vec<String>>,
    /// `(served, status)`: every fetch after `served` successful ones fails.
    fail_after: Option<(usize, u16)>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedTransport {
    pub fn new(pages: Vec<Value>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            urls: Mutex::new(Vec::new()),
            fail_after: None,
            cancel_after: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self::new(Vec::new()).fail_after(0, status)
    }

    /// Serves `served` scripted pages, then answers `status` from then on.
    pub fn fail_after(mut self, served: usize, status: u16) -> Self {
        self.fail_after = Some((served, status));
        self
    }

    /// Fires `token` once `fetches` pages have been served.
    pub fn cancel_after(mut self, fetches: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((fetches, token));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveTransport for ScriptedTransport {
    async fn fetch_page(
        &self,
        url: &str,
        _cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        let served = {
            let mut urls = self.urls.lock().unwrap();
            urls.push(url.to_string());
            urls.len()
        };

        if let Some((after, status)) = self.fail_after {
            if served > after {
                return Err(TransportError::Status {
                    status,
                    body: "unavailable".into(),
                });
            }
        }

        let page = self.pages.lock().unwrap().pop_front().unwrap_or_else(|| json!({}));

        if let Some((after, token)) = &self.cancel_after {
            if served >= *after {
                token.cancel();
            }
        }

        Ok(page)
    }
}
