// crates/lino-account/src/model.rs

use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, Coin};

/// Immutable registration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub username: AccountKey,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBank {
    pub saving: Coin,
}

/// Activity timestamps (unix seconds of block time) and lifetime counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub last_activity_at: i64,
    pub last_post_at: i64,
    pub last_report_or_upvote_at: i64,
    pub total_direct_deposit: Coin,
}

/// Donation history between one consumer and one author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub donation_times: u64,
}
