use log::debug;

use super::{Block, hasher, pow};
use crate::error::NodeError;

/// Walk `chain` pairwise and report the first broken link or bad proof.
pub fn check_chain(chain: &[Block]) -> Result<(), NodeError> {
    for pair in chain.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if current.previous_hash != hasher::digest(previous) {
            return Err(NodeError::InvalidChain(format!(
                "block {} does not link to block {}",
                current.index, previous.index
            )));
        }

        if !pow::is_valid_proof(previous.proof, current.proof) {
            return Err(NodeError::InvalidChain(format!(
                "block {} carries an invalid proof",
                current.index
            )));
        }
    }
    Ok(())
}

/// Structural and proof check usable on any candidate chain, local or not.
/// Empty and single-block chains are trivially valid.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    match check_chain(chain) {
        Ok(()) => true,
        Err(e) => {
            debug!("{e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{check_chain, is_valid_chain};
    use crate::blockchain::testutil::seven_block_chain;
    use crate::blockchain::{Block, pow};

    #[test]
    fn trivial_chains_are_valid() {
        assert!(is_valid_chain(&[]));
        assert!(is_valid_chain(&[Block::genesis()]));
    }

    #[test]
    fn mined_chain_is_valid() {
        assert!(is_valid_chain(&seven_block_chain()));
    }

    #[test]
    fn tampered_amount_breaks_the_chain() {
        let mut chain = seven_block_chain();
        chain[3].transactions[0].amount += 1;
        assert!(!is_valid_chain(&chain));
    }

    #[test]
    fn tampered_previous_hash_is_reported() {
        let mut chain = seven_block_chain();
        chain[3].previous_hash = "00".repeat(32);
        let err = check_chain(&chain).unwrap_err().to_string();
        assert!(err.contains("block 4 does not link"), "{err}");
    }

    #[test]
    fn bad_proof_is_rejected_even_when_links_hold() {
        let genesis = Block::genesis();
        // Anything below the first solution for the genesis proof is invalid.
        let wrong = pow::solve(genesis.proof) - 1;
        let forged = Block::new(2, Vec::new(), wrong, genesis.hash());

        let err = check_chain(&[genesis, forged]).unwrap_err().to_string();
        assert!(err.contains("invalid proof"), "{err}");
    }
}
