use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::NodeError;
use crate::network::resolve_conflicts;

#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, NodeError> {
    let nodes = body.into_inner().nodes.ok_or_else(|| {
        NodeError::MalformedInput("Error, please provide a valid list of nodes".to_string())
    })?;

    let total_nodes = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        let added = peers.register_all(nodes.as_slice())?;
        info!("registered {added} new peers ({} total)", peers.len());
        peers.addresses()
    };

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes,
    }))
}

/// Run consensus against every registered peer.
#[get("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> HttpResponse {
    let peers = state.peers.lock().expect("mutex poisoned").addresses();

    let replaced = resolve_conflicts(
        &state.ledger,
        &peers,
        state.transport.as_ref(),
        state.config.peer_timeout,
    )
    .await;

    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    let chain = state.ledger.lock().expect("mutex poisoned").chain().to_vec();

    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        message: message.to_string(),
        chain,
    })
}
