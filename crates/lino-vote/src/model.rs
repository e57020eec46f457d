// crates/lino-vote/src/model.rs

use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, Coin};

/// A registered voter.
///
/// Exists only while `deposit` is non-zero; a full withdraw deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub username: AccountKey,
    /// Self-staked coin.
    pub deposit: Coin,
    /// Sum of every live delegation to this voter.
    pub delegated_power: Coin,
}

/// Coin one delegator has lent to one voter. Deleted when it reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: AccountKey,
    pub amount: Coin,
}

/// A cast governance vote. Written once; `voting_power` is the snapshot at
/// cast time and is never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: AccountKey,
    pub result: bool,
    pub voting_power: Coin,
}

/// Validator sets maintained by the block executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceList {
    /// Every registered validator.
    pub all_validators: Vec<AccountKey>,
    /// Validators currently producing blocks.
    pub oncall_validators: Vec<AccountKey>,
}
