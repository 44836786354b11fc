use log::info;

use super::Block;
use crate::transaction::Transaction;

/// In-memory ledger: the chain plus the pool of transactions waiting for the
/// next seal. The chain is never empty; genesis is created here and nowhere else.
///
/// Callers share one instance behind a single `Mutex`, so queuing, sealing and
/// chain replacement are mutually exclusive.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.next_index()
    }

    /// Seal the pending pool into a new block and append it.
    /// Without `previous_hash` the block links to the digest of the current tip.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(
            self.next_index(),
            transactions,
            proof,
            previous_hash,
        );
        self.chain.push(block.clone());
        block
    }

    /// Seal a block found by searching against `tip_hash`, crediting
    /// `reward_recipient`. Returns `None`, leaving the pool untouched, when the
    /// tip is no longer the block the proof was searched for.
    pub fn seal_on_tip(
        &mut self,
        tip_hash: &str,
        proof: u64,
        reward_recipient: &str,
    ) -> Option<Block> {
        if self.last_block().hash() != tip_hash {
            return None;
        }
        self.pending.push(Transaction::reward(reward_recipient));
        let block = self.new_block(proof, Some(tip_hash.to_string()));
        info!(
            "sealed block {} with {} transactions (proof={})",
            block.index,
            block.transactions.len(),
            block.proof
        );
        Some(block)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds the genesis block")
    }

    /// Swap in a whole new chain at once. Pending transactions are kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        if chain.is_empty() {
            return;
        }
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Index the next sealed block gets: chain length + 1.
    fn next_index(&self) -> u64 {
        self.chain.len() as u64 + 1
    }
}
