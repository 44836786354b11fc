use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Everything that can go wrong on a node. None of these are fatal: they are
/// either rejected at the request boundary or absorbed by consensus.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid chain: {0}")]
    InvalidChain(String),

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    MalformedPeerResponse { peer: String, reason: String },

    #[error("no proof found within {0} iterations, retry later")]
    ExhaustedSearch(u64),

    #[error("proof search cancelled")]
    SearchCancelled,

    #[error("chain tip moved {0} times while mining, retry later")]
    StaleTip(u32),

    #[error("mining worker failed: {0}")]
    Worker(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            // Invalid chains only ever arrive from peers.
            NodeError::InvalidChain(_)
            | NodeError::PeerUnreachable { .. }
            | NodeError::MalformedPeerResponse { .. } => StatusCode::BAD_GATEWAY,
            NodeError::StaleTip(_) => StatusCode::CONFLICT,
            NodeError::ExhaustedSearch(_) | NodeError::SearchCancelled | NodeError::Worker(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
