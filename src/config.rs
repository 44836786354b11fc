use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use uuid::Uuid;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MINE_RETRIES: u32 = 3;

/// Runtime settings of one node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Recipient of this node's mining rewards.
    pub node_id: String,
    pub peer_timeout: Duration,
    /// Soft cap on proof candidates per search; `None` searches forever.
    pub mine_max_iterations: Option<u64>,
    pub mine_retries: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            node_id: fresh_node_id(),
            peer_timeout: Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS),
            mine_max_iterations: None,
            mine_retries: DEFAULT_MINE_RETRIES,
        }
    }
}

impl NodeConfig {
    /// Read the process environment; a first CLI argument overrides `PORT`.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        if let Some(port) = env::args().nth(1) {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("ignoring invalid port argument {port:?}"),
            }
        }
        config
    }

    /// Build from any key lookup. Missing or unparseable values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            node_id: lookup("NODE_ID")
                .filter(|id| !id.trim().is_empty())
                .unwrap_or(defaults.node_id),
            peer_timeout: parsed(&lookup, "PEER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.peer_timeout),
            mine_max_iterations: parsed(&lookup, "MINE_MAX_ITERATIONS")
                .filter(|n| *n > 0)
                .or(defaults.mine_max_iterations),
            mine_retries: parsed(&lookup, "MINE_RETRIES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.mine_retries),
        }
    }
}

/// Globally unique node address, UUID v4 without hyphens.
pub fn fresh_node_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{key}={raw:?} is not valid, using default");
            None
        }
    }
}
