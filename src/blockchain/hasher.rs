use serde::Serialize;
use sha2::{Digest, Sha256};

use super::Block;

/// SHA-256 of `bytes`, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Canonical JSON text of any serializable value.
///
/// Going through `serde_json::Value` sorts object keys (its default map is a
/// `BTreeMap`), so two values with the same fields render identically no
/// matter in which order those fields were built or received.
pub fn canonical_json<T: Serialize>(value: &T) -> String {
    let value = serde_json::to_value(value).expect("ledger types serialize to JSON");
    value.to_string()
}

/// Digest of a block's canonical form.
pub fn digest(block: &Block) -> String {
    sha256_hex(canonical_json(block).as_bytes())
}
