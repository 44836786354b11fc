use actix_web::{HttpResponse, get, web};
use log::{debug, warn};

use super::models::{AppState, MineResponse};
use crate::blockchain::{Block, pow};
use crate::error::NodeError;

/// Mine a block from the pending pool:
/// - snapshot the tip (proof + digest) under the ledger lock
/// - search for a proof on the blocking pool, lock released
/// - re-lock, confirm the tip did not move, credit the reward and seal
///
/// If another seal or a chain replacement moved the tip meanwhile, the search
/// starts over against the new tip, up to `mine_retries` times.
#[get("/mine/")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse, NodeError> {
    let cancel = state.shutdown.clone();
    let cap = state.config.mine_max_iterations;
    let block = mine_with(&state, move |last_proof| {
        pow::solve_bounded(last_proof, &cancel, cap)
    })
    .await?;

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

/// The snapshot/search/seal loop behind [`mine`], with the proof search
/// supplied by the caller. `search` runs on the blocking pool.
pub(crate) async fn mine_with<S>(state: &AppState, search: S) -> Result<Block, NodeError>
where
    S: Fn(u64) -> Result<u64, NodeError> + Clone + Send + 'static,
{
    let retries = state.config.mine_retries;

    for attempt in 1..=retries {
        let (last_proof, tip_hash) = {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            let tip = ledger.last_block();
            (tip.proof, tip.hash())
        };
        debug!("MINER - attempt {attempt}: searching against proof {last_proof}");

        let search = search.clone();
        let proof = web::block(move || search(last_proof))
            .await
            .map_err(|e| NodeError::Worker(e.to_string()))??;

        let sealed = {
            let mut ledger = state.ledger.lock().expect("mutex poisoned");
            ledger.seal_on_tip(&tip_hash, proof, &state.config.node_id)
        };

        match sealed {
            Some(block) => return Ok(block),
            None => warn!("MINER - tip moved during attempt {attempt}, searching again"),
        }
    }

    Err(NodeError::StaleTip(retries))
}
