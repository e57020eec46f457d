// crates/lino-vote/src/lib.rs
//
// lino-vote: the stake ledger and the vote manager built on it.
//
// Tracks voter self-deposits, delegated power, per-(voter, delegator)
// delegations, write-once governance votes, and the validator reference list
// used for withdraw legality and absence penalties.

pub mod manager;
pub mod model;
pub mod storage;

// Re-export key types for ergonomic access from downstream crates.
pub use manager::VoteManager;
pub use model::{Delegation, ReferenceList, Vote, Voter};
pub use storage::VoteStorage;
