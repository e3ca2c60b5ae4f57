//! Transaction feed client with lazy connection handling.
//!
//! # Responsibilities
//! - Hold the shared channel to the feed endpoint
//! - Open one server stream per accepted request value
//! - Surface open failures without tearing anything down
//!
//! # Design Decisions
//! - The channel connects lazily: an unreachable feed at startup is not
//!   fatal, the first stream open reports it instead
//! - Cloning the client is cheap; every connection gets its own handle
//!   over the same multiplexed channel

use std::time::Duration;

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::Streaming;

use crate::backend::proto::tx_feed_client::TxFeedClient;
use crate::backend::proto::{Transaction, TransactionFilter};
use crate::config::BackendConfig;

/// Errors from the transaction feed client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The configured feed address is not a valid endpoint URI.
    #[error("Invalid feed endpoint: {0}")]
    Endpoint(#[from] tonic::transport::Error),

    /// The feed refused or failed a stream open.
    #[error("Stream open failed: {0}")]
    Open(#[from] tonic::Status),
}

/// Client handle for the transaction feed.
#[derive(Clone)]
pub struct BackendClient {
    channel: Channel,
}

impl BackendClient {
    /// Create a client for the configured feed endpoint.
    ///
    /// Fails only if the address does not parse; connecting is deferred
    /// until the first stream open.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let endpoint = Endpoint::from_shared(config.address.clone())?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        Ok(Self {
            channel: endpoint.connect_lazy(),
        })
    }

    /// Open a server stream of transactions at or above `min_value`.
    pub async fn open_stream(&self, min_value: f32) -> Result<Streaming<Transaction>, BackendError> {
        let mut client = TxFeedClient::new(self.channel.clone());
        let response = client
            .stream_transactions(TransactionFilter { min_value })
            .await?;
        Ok(response.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_endpoint() {
        let config = BackendConfig {
            address: "not a uri".to_string(),
            connect_timeout_secs: 5,
        };
        assert!(matches!(
            BackendClient::new(&config),
            Err(BackendError::Endpoint(_))
        ));
    }

    // connect_lazy spawns the channel worker, so a runtime must be up.
    #[tokio::test]
    async fn accepts_unreachable_endpoint() {
        // Lazy connection: construction must not dial.
        let config = BackendConfig {
            address: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 5,
        };
        assert!(BackendClient::new(&config).is_ok());
    }
}
