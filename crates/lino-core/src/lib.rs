// crates/lino-core/src/lib.rs
//
// lino-core: Core types, coin arithmetic, errors, parameters, and storage
// contracts for the Lino ledger.
//
// This is the leaf crate every other crate in the workspace depends on. All
// monetary values are integer `Coin` (1 LNO = 10^5 coin) and all rates are
// exact `Rational`s, so every replica computes identical state.

pub mod coin;
pub mod error;
pub mod param;
pub mod rational;
pub mod state;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic access from downstream crates.
pub use coin::{Coin, COIN_PER_LNO};
pub use error::LinoError;
pub use param::{
    DeveloperParam, EvaluateParam, GlobalParam, Params, PostParam, ValidatorParam, VoteParam,
};
pub use rational::Rational;
pub use state::{BlockInfo, Context, KvStore, StagedStore, WriteBatch};
pub use traits::{AccountLedger, DeveloperRegistry, GlobalPool, PostLedger, StakeLedger};
pub use types::{
    AccountKey, DonationKind, PenaltyList, Permlink, ProposalKey, ProposalType, RewardEvent,
};
