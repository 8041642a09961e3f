//! # HTTP Transport
//!
//! [`SyncTransport`] implementation that posts queued operations to the
//! inventory backend as JSON.

use async_trait::async_trait;
use reqwest::Client;

use super::transport::{SyncTransport, TransportError};
use crate::offline::QueuedOperation;

/// Posts operations to `{base_url}/api/v1/sync/operations`.
///
/// Errors from the socket layer (refused, timed out, DNS) map to
/// [`TransportError::Unreachable`]; any non-2xx response maps to
/// [`TransportError::Rejected`] with the status and body preserved.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Build with a preconfigured client, e.g. one carrying auth headers
    /// or custom timeouts.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v1/sync/operations", self.base_url)
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn submit(&self, item: &QueuedOperation) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(item)
            .send()
            .await
            .map_err(|e| TransportError::unreachable(e.to_string()))?;

        if response.status().is_success() {
            tracing::debug!(op_id = %item.operation.id(), "operation accepted by backend");
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(TransportError::rejected(format!("HTTP {}: {}", status, body)))
    }
}
