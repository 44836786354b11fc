use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::PROOF_PREFIX;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    // Separate short locks; the numbers are a best-effort snapshot.
    let (height, pending) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.pending().len())
    };
    let peers = state.peers.lock().expect("mutex poisoned").len();

    HttpResponse::Ok().json(StatsResponse {
        node_id: state.config.node_id.clone(),
        height,
        pending,
        peers,
        proof_prefix: PROOF_PREFIX,
    })
}
