// crates/lino-store/src/hash.rs
//
// Deterministic state hash.
//
// SHA-256 over every `(key, value)` pair in ascending key order, each field
// length-prefixed so that no two distinct states share a preimage.

use sha2::{Digest, Sha256};

use lino_core::error::LinoError;
use lino_core::state::KvStore;

/// Hex-encoded SHA-256 of the entire committed state.
pub fn state_hash(store: &dyn KvStore) -> Result<String, LinoError> {
    let mut hasher = Sha256::new();
    for (key, value) in store.scan_prefix(b"")? {
        hasher.update((key.len() as u64).to_be_bytes());
        hasher.update(&key);
        hasher.update((value.len() as u64).to_be_bytes());
        hasher.update(&value);
    }
    Ok(hex::encode(hasher.finalize()))
}
