//! Longest-valid-chain conflict resolution.

use std::sync::Mutex;
use std::time::Duration;

use actix_web::rt::time::timeout;
use futures::future::join_all;
use log::{debug, info, warn};

use super::transport::{PeerChain, PeerTransport};
use crate::blockchain::validation::check_chain;
use crate::blockchain::{Block, Ledger};
use crate::error::NodeError;

/// Ask every peer for its chain and adopt the longest valid one that is
/// strictly longer than ours. Returns whether the local chain was replaced.
///
/// Fetches run concurrently, each bounded by `fetch_timeout`; a peer that
/// fails, hangs or answers garbage is skipped. The ledger lock is only taken
/// to read the starting length and for the final swap.
pub async fn resolve_conflicts<T>(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    transport: &T,
    fetch_timeout: Duration,
) -> bool
where
    T: PeerTransport + ?Sized,
{
    let local_len = ledger.lock().expect("mutex poisoned").len();

    let fetches = peers.iter().map(|peer| async move {
        let result = match timeout(fetch_timeout, transport.fetch_chain(peer)).await {
            Ok(result) => result,
            Err(_) => Err(NodeError::PeerUnreachable {
                peer: peer.clone(),
                reason: format!("no answer within {fetch_timeout:?}"),
            }),
        };
        (peer, result)
    });
    let responses = join_all(fetches).await;

    let mut best_len = local_len;
    let mut best: Option<Vec<Block>> = None;
    for (peer, result) in responses {
        match result.and_then(|reply| candidate(peer, reply, best_len)) {
            Ok(Some(chain)) => {
                debug!("peer {peer} offers a valid chain of {} blocks", chain.len());
                best_len = chain.len();
                best = Some(chain);
            }
            Ok(None) => debug!("peer {peer} has nothing longer than {best_len} blocks"),
            Err(e) => warn!("skipping peer {peer}: {e}"),
        }
    }

    let Some(chain) = best else {
        return false;
    };

    let mut ledger = ledger.lock().expect("mutex poisoned");
    // The local chain may have grown while we were fetching.
    if chain.len() <= ledger.len() {
        info!(
            "discarding peer chain of {} blocks, local chain grew to {}",
            chain.len(),
            ledger.len()
        );
        return false;
    }
    info!(
        "replacing local chain ({} blocks) with peer chain ({} blocks)",
        ledger.len(),
        chain.len()
    );
    ledger.replace_chain(chain);
    true
}

/// Decide whether a peer's reply beats `best_len`. Ties never win.
fn candidate(
    peer: &str,
    reply: PeerChain,
    best_len: usize,
) -> Result<Option<Vec<Block>>, NodeError> {
    if reply.length != reply.chain.len() {
        return Err(NodeError::MalformedPeerResponse {
            peer: peer.to_string(),
            reason: format!(
                "reported length {} but sent {} blocks",
                reply.length,
                reply.chain.len()
            ),
        });
    }
    if reply.length <= best_len {
        return Ok(None);
    }
    check_chain(&reply.chain)?;
    Ok(Some(reply.chain))
}

#[cfg(test)]
mod tests {
    use super::resolve_conflicts;
    use crate::blockchain::testutil::seven_block_chain;
    use crate::blockchain::{Block, Ledger};
    use crate::error::NodeError;
    use crate::network::transport::{PeerChain, PeerTransport};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Reply {
        Chain(Vec<Block>),
        Lying(usize, Vec<Block>),
        Down,
        Hang,
    }

    #[derive(Default)]
    struct ScriptedTransport {
        replies: HashMap<String, Reply>,
    }

    impl ScriptedTransport {
        fn with(mut self, peer: &str, reply: Reply) -> Self {
            self.replies.insert(peer.to_string(), reply);
            self
        }

        fn peers(&self) -> Vec<String> {
            self.replies.keys().cloned().collect()
        }
    }

    #[async_trait]
    impl PeerTransport for ScriptedTransport {
        async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, NodeError> {
            match self.replies.get(peer) {
                Some(Reply::Chain(chain)) => Ok(PeerChain {
                    length: chain.len(),
                    chain: chain.clone(),
                }),
                Some(Reply::Lying(length, chain)) => Ok(PeerChain {
                    length: *length,
                    chain: chain.clone(),
                }),
                Some(Reply::Hang) => {
                    actix_web::rt::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("fetch should have timed out")
                }
                Some(Reply::Down) | None => Err(NodeError::PeerUnreachable {
                    peer: peer.to_string(),
                    reason: "connection refused".into(),
                }),
            }
        }
    }

    fn local_ledger(length: usize) -> Mutex<Ledger> {
        let mut ledger = Ledger::new();
        ledger.replace_chain(seven_block_chain()[..length].to_vec());
        Mutex::new(ledger)
    }

    async fn resolve(ledger: &Mutex<Ledger>, transport: &ScriptedTransport) -> bool {
        resolve_conflicts(
            ledger,
            &transport.peers(),
            transport,
            Duration::from_millis(200),
        )
        .await
    }

    #[actix_web::test]
    async fn adopts_longer_valid_chain() {
        let ledger = local_ledger(5);
        let transport =
            ScriptedTransport::default().with("http://y:5000", Reply::Chain(seven_block_chain()));

        assert!(resolve(&ledger, &transport).await);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 7);
        assert_eq!(ledger.chain(), seven_block_chain().as_slice());
    }

    #[actix_web::test]
    async fn rejects_longer_chain_with_tampered_link() {
        let ledger = local_ledger(5);
        let mut tampered = seven_block_chain();
        tampered[3].previous_hash = "ab".repeat(32);
        let transport = ScriptedTransport::default().with("http://y:5000", Reply::Chain(tampered));

        assert!(!resolve(&ledger, &transport).await);
        assert_eq!(ledger.lock().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn never_adopts_equal_or_shorter_chain() {
        let ledger = local_ledger(5);
        let before = ledger.lock().unwrap().chain().to_vec();
        let transport = ScriptedTransport::default()
            .with("http://same:5000", Reply::Chain(seven_block_chain()[..5].to_vec()))
            .with("http://short:5000", Reply::Chain(seven_block_chain()[..3].to_vec()));

        assert!(!resolve(&ledger, &transport).await);
        assert_eq!(ledger.lock().unwrap().chain(), before.as_slice());
    }

    #[actix_web::test]
    async fn failing_peers_do_not_abort_resolution() {
        let ledger = local_ledger(2);
        let transport = ScriptedTransport::default()
            .with("http://down:5000", Reply::Down)
            .with("http://hung:5000", Reply::Hang)
            .with("http://liar:5000", Reply::Lying(40, seven_block_chain()[..3].to_vec()))
            .with("http://good:5000", Reply::Chain(seven_block_chain()[..6].to_vec()));

        assert!(resolve(&ledger, &transport).await);
        assert_eq!(ledger.lock().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn picks_the_longest_of_several_valid_chains() {
        let ledger = local_ledger(1);
        let transport = ScriptedTransport::default()
            .with("http://a:5000", Reply::Chain(seven_block_chain()[..4].to_vec()))
            .with("http://b:5000", Reply::Chain(seven_block_chain()))
            .with("http://c:5000", Reply::Chain(seven_block_chain()[..6].to_vec()));

        assert!(resolve(&ledger, &transport).await);
        assert_eq!(ledger.lock().unwrap().len(), 7);
    }

    #[actix_web::test]
    async fn no_peers_means_no_change() {
        let ledger = local_ledger(3);
        assert!(!resolve(&ledger, &ScriptedTransport::default()).await);
        assert_eq!(ledger.lock().unwrap().len(), 3);
    }
}
