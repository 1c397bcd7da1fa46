use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::TransportError;

/// Fetches one raw archive page.
///
/// Implementations may abort an in-flight request when `cancel` fires and
/// report it as [`TransportError::Aborted`].
#[async_trait]
pub trait ArchiveTransport: Send + Sync {
    async fn fetch_page(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError>;
}

/// HTTP transport backed by a shared reqwest client.
pub struct ArchiveHttpClient {
    client: Client,
}

impl ArchiveHttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        if text.trim().is_empty() {
            // the archive answers an empty range with an empty body
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl Default for ArchiveHttpClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ArchiveTransport for ArchiveHttpClient {
    async fn fetch_page(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        debug!("GET {}", url);

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Aborted),
            result = self.get_json(url) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_aborts_before_connecting() {
        let client = ArchiveHttpClient::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        // unroutable address: only the cancellation branch can complete
        let result = client
            .fetch_page("http://10.255.255.1:9/api/archive/x/events", &cancel)
            .await;
        assert!(matches!(result, Err(TransportError::Aborted)));
    }
}
