use std::collections::BTreeSet;

use log::info;
use reqwest::Url;

use crate::error::NodeError;

/// Deduplicated set of peer origins. Peers are only ever added.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert one address. Returns `false` if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool, NodeError> {
        let peer = normalize_address(address)?;
        let added = self.peers.insert(peer.clone());
        if added {
            info!("registered peer {peer}");
        }
        Ok(added)
    }

    /// Register a batch. Nothing is inserted unless every address normalizes.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize, NodeError> {
        for address in addresses {
            normalize_address(address.as_ref())?;
        }
        let mut added = 0;
        for address in addresses {
            if self.register(address.as_ref())? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}

/// Reduce an address to `scheme://host[:port]`. A bare `host:port` is taken as http.
pub fn normalize_address(address: &str) -> Result<String, NodeError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(NodeError::MalformedInput("empty peer address".into()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| NodeError::MalformedInput(format!("peer address {address:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(NodeError::MalformedInput(format!(
            "peer address {address:?} is not an http(s) location"
        )));
    }
    Ok(url.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::{PeerRegistry, normalize_address};

    #[test]
    fn normalizes_to_origin() {
        assert_eq!(
            normalize_address("http://192.168.0.5:5000/chain").unwrap(),
            "http://192.168.0.5:5000"
        );
        assert_eq!(
            normalize_address("localhost:5001").unwrap(),
            "http://localhost:5001"
        );
        assert_eq!(
            normalize_address("HTTP://Example.COM:80").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("ftp://host:21").is_err());
        assert!(normalize_address("http://").is_err());
    }

    #[test]
    fn registration_is_idempotent() {
        let mut peers = PeerRegistry::new();
        assert!(peers.register("http://localhost:5001").unwrap());
        assert!(!peers.register("localhost:5001/").unwrap());
        assert_eq!(peers.len(), 1);
    }

    #[test]
    fn batch_with_bad_address_inserts_nothing() {
        let mut peers = PeerRegistry::new();
        assert!(peers.register_all(&["localhost:5001", "ftp://x"]).is_err());
        assert_eq!(peers.len(), 0);

        let added = peers
            .register_all(&["localhost:5001", "http://localhost:5001", "10.0.0.2:5000"])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(
            peers.addresses(),
            vec!["http://10.0.0.2:5000", "http://localhost:5001"]
        );
    }
}
