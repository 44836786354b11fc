pub mod consensus;
pub mod peers;
pub mod transport;

pub use consensus::resolve_conflicts;
pub use peers::PeerRegistry;
pub use transport::{HttpTransport, PeerChain, PeerTransport};
