// crates/lino-store/src/lib.rs
//
// lino-store: Storage backends for the Lino ledger.
//
// Provides an ordered in-memory store (tests, tooling) and a RocksDB-backed
// store that commits each message's `WriteBatch` atomically, plus a
// deterministic state hash replicas can compare after every block.

pub mod hash;
pub mod memory;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use hash::state_hash;
pub use memory::MemoryStore;
pub use rocks::RocksStore;
