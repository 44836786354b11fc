//! Proof-of-work puzzle: find `proof` such that
//! `sha256(format!("{last_proof}{proof}"))` starts with [`PROOF_PREFIX`].

use std::sync::atomic::{AtomicBool, Ordering};

use super::PROOF_PREFIX;
use super::hasher::sha256_hex;
use crate::error::NodeError;

/// How often the bounded search looks at its cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Does `proof` solve the puzzle posed by `last_proof`?
pub fn is_valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    sha256_hex(guess.as_bytes()).starts_with(PROOF_PREFIX)
}

/// Linear search from 0 for the first valid proof. Unbounded.
pub fn solve(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !is_valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same search as [`solve`], but it stops when `cancel` is raised or after
/// `max_iterations` candidates have been tried.
pub fn solve_bounded(
    last_proof: u64,
    cancel: &AtomicBool,
    max_iterations: Option<u64>,
) -> Result<u64, NodeError> {
    let mut proof = 0u64;
    loop {
        if let Some(cap) = max_iterations {
            if proof >= cap {
                return Err(NodeError::ExhaustedSearch(cap));
            }
        }
        if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return Err(NodeError::SearchCancelled);
        }
        if is_valid_proof(last_proof, proof) {
            return Ok(proof);
        }
        proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_proof, solve, solve_bounded};
    use crate::blockchain::hasher::sha256_hex;
    use crate::error::NodeError;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn solved_proof_is_valid() {
        let proof = solve(100);
        assert!(is_valid_proof(100, proof));
        let digest = sha256_hex(format!("100{proof}").as_bytes());
        assert_eq!(&digest[..4], "0000");
    }

    #[test]
    fn solve_returns_first_solution() {
        let proof = solve(100);
        assert!((0..proof).all(|p| !is_valid_proof(100, p)));
    }

    #[test]
    fn bounded_search_agrees_with_unbounded() {
        let cancel = AtomicBool::new(false);
        assert_eq!(solve_bounded(100, &cancel, None).unwrap(), solve(100));
    }

    #[test]
    fn bounded_search_gives_up_at_cap() {
        let cancel = AtomicBool::new(false);
        let first = solve(100);
        let err = solve_bounded(100, &cancel, Some(first)).unwrap_err();
        assert!(matches!(err, NodeError::ExhaustedSearch(cap) if cap == first));
    }

    #[test]
    fn raised_flag_cancels_search() {
        let cancel = AtomicBool::new(true);
        let err = solve_bounded(100, &cancel, None).unwrap_err();
        assert!(matches!(err, NodeError::SearchCancelled));
    }
}
