use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::network::{HttpTransport, PeerRegistry, PeerTransport};
use crate::transaction::Transaction;

/// Shared state of one node: its ledger, known peers and the way to reach them.
pub struct AppState {
    pub config: NodeConfig,
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerRegistry>,
    pub transport: Box<dyn PeerTransport>,
    /// Raised once the server stops; running proof searches give up.
    pub shutdown: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let transport = HttpTransport::new(config.peer_timeout)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    pub fn with_transport(config: NodeConfig, transport: Box<dyn PeerTransport>) -> Self {
        Self {
            config,
            ledger: Mutex::new(Ledger::new()),
            peers: Mutex::new(PeerRegistry::new()),
            transport,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

/// Every field is optional so a missing one can be reported by name.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub message: String,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub height: usize,
    pub pending: usize,
    pub peers: usize,
    pub proof_prefix: &'static str,
}
