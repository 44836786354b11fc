use serde::{Deserialize, Serialize};

use crate::blockchain::{MINING_REWARD, REWARD_SENDER};

/// A value transfer waiting in the pending pool until the next block seal.
/// Addresses are opaque; no funds or signature checks are made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Reward credited to the sealing node. The sender is the `"0"` sentinel.
    pub fn reward(recipient: impl Into<String>) -> Self {
        Self::new(REWARD_SENDER, recipient, MINING_REWARD)
    }
}
