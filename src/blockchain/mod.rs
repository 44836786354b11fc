pub mod block;
pub mod hasher;
pub mod ledger;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use ledger::Ledger;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` of the genesis block, which has no real predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A proof is valid when the digest of `last_proof ++ proof` starts with this.
pub const PROOF_PREFIX: &str = "0000";

/// Sender recorded on the reward transaction of every mined block.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the node that seals a block.
pub const MINING_REWARD: u64 = 1;
