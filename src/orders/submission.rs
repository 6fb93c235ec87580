//! Order submission

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::orders::Order;

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// An HTTP transport or serialization error occurred.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The order endpoint rejected the order.
    #[error("order rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Response body
        body: String,
    },
}

/// Sends a finished order somewhere that will fulfil it.
#[automock]
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit the order.
    async fn submit(&self, order: &Order) -> Result<(), SubmissionError>;
}

/// Posts orders as JSON to `{base_url}/orders`.
#[derive(Debug, Clone)]
pub struct HttpOrderSubmitter {
    base_url: String,
    http: Client,
}

impl HttpOrderSubmitter {
    /// Create a submitter for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a submitter that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// URL of the order endpoint.
    #[must_use]
    pub fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

#[async_trait]
impl OrderSubmitter for HttpOrderSubmitter {
    async fn submit(&self, order: &Order) -> Result<(), SubmissionError> {
        let url = self.orders_url();

        debug!(%url, items = order.items().len(), "submitting order");

        let response = self.http.post(&url).json(&order.payload()).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(SubmissionError::Rejected { status, body });
        }

        Ok(())
    }
}
