// crates/lino-post/src/model.rs
//
// Persisted post records.

use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, Coin, Permlink, Rational};

/// External reference attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLink {
    pub identifier: String,
    pub url: String,
}

/// Author-controlled content of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    pub author: AccountKey,
    pub post_id: String,
    pub title: String,
    pub content: String,
    /// Post this one comments on.
    pub parent: Option<Permlink>,
    /// Post this one is derived from. Donations are partly forwarded to it.
    pub source: Option<Permlink>,
    pub links: Vec<PostLink>,
}

/// Protocol-maintained state of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    pub created_at: i64,
    pub last_updated_at: i64,
    pub last_activity_at: i64,
    /// Fraction of donations to a derivative of this post that the
    /// derivative keeps. In [0, 1].
    pub redistribution_split_rate: Rational,
    pub total_donate_count: u64,
    /// Cumulative direct deposits credited to the author through this post.
    pub total_reward: Coin,
    pub total_upvote_stake: Coin,
    pub total_report_stake: Coin,
    pub total_view_count: u64,
    pub is_deleted: bool,
}

/// Per-(post, consumer) donation ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donations {
    pub username: AccountKey,
    pub times: u64,
    pub amount: Coin,
}

/// Latest report or upvote an account recorded on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOrUpvote {
    pub username: AccountKey,
    pub stake: Coin,
    pub is_report: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub username: AccountKey,
    pub times: u64,
    pub last_view_at: i64,
}

/// Link from a parent post to one of its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: AccountKey,
    pub post_id: String,
    pub created_at: i64,
}
