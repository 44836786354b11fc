use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::blockchain::Block;
use crate::error::NodeError;

/// Path every node serves its chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// A peer's answer to "what is your chain?".
#[derive(Debug, Clone, Deserialize)]
pub struct PeerChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Capability to obtain a peer's chain. Implementations should bound each
/// call themselves; consensus additionally wraps every call in a timeout.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, NodeError>;
}

/// Fetches chains from other nodes over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, NodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NodeError::Worker(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, NodeError> {
        let url = format!("{peer}{CHAIN_PATH}");
        debug!("GET {url}");

        let unreachable = |e: reqwest::Error| NodeError::PeerUnreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(unreachable)?
            .error_for_status()
            .map_err(unreachable)?;

        response
            .json::<PeerChain>()
            .await
            .map_err(|e| NodeError::MalformedPeerResponse {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
    }
}
