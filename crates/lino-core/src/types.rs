// crates/lino-core/src/types.rs
//
// Identifier and value types shared by every ledger crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coin::Coin;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_POST_ID_LEN: usize = 64;

/// Unique account name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(pub String);

impl AccountKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Usernames are 3 to 20 characters of `[a-z0-9.-]`, starting with a
    /// letter. The restricted alphabet keeps store keys unambiguous.
    pub fn is_valid(&self) -> bool {
        let name = self.0.as_bytes();
        (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&name.len())
            && name[0].is_ascii_lowercase()
            && name
                .iter()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == b'.' || *c == b'-')
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Governance proposal identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalKey(pub String);

impl fmt::Display for ProposalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProposalKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Post identity: `(author, post_id)`. Immutable once a post is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permlink {
    pub author: AccountKey,
    pub post_id: String,
}

impl Permlink {
    pub fn new(author: impl Into<AccountKey>, post_id: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            post_id: post_id.into(),
        }
    }
}

impl Permlink {
    /// Post ids may not contain the key separators `:` and `#`.
    pub fn is_valid_post_id(post_id: &str) -> bool {
        !post_id.is_empty()
            && post_id.len() <= MAX_POST_ID_LEN
            && !post_id.contains(':')
            && !post_id.contains('#')
    }
}

impl fmt::Display for Permlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.author, self.post_id)
    }
}

/// Proposal kinds. Only `ChangeParam` and `ProtocolUpgrade` require every
/// on-call validator to vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    ChangeParam,
    ContentCensorship,
    ProtocolUpgrade,
}

impl ProposalType {
    pub fn requires_validator_participation(&self) -> bool {
        matches!(self, ProposalType::ChangeParam | ProposalType::ProtocolUpgrade)
    }
}

/// On-call validators who skipped a mandatory vote. Computed per query,
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyList {
    pub penalty_list: Vec<AccountKey>,
}

/// How a coin movement is recorded on a post's donation ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationKind {
    /// Credited straight to the author's balance after friction.
    DirectDeposit,
}

/// Deferred content-reward record emitted once per donation leg.
///
/// Built by the settlement pipeline, then owned by the global pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub post_author: AccountKey,
    pub post_id: String,
    pub consumer: AccountKey,
    pub evaluate: Coin,
    pub original: Coin,
    pub friction: Coin,
    pub from_app: Option<AccountKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(AccountKey::new("alice").is_valid());
        assert!(AccountKey::new("a1.b-c").is_valid());
        assert!(!AccountKey::new("al").is_valid());
        assert!(!AccountKey::new("1alice").is_valid());
        assert!(!AccountKey::new("Alice").is_valid());
        assert!(!AccountKey::new("ali:ce").is_valid());
        assert!(!AccountKey::new("a".repeat(21)).is_valid());
    }

    #[test]
    fn test_permlink_display_and_post_id() {
        assert_eq!(Permlink::new("alice", "p1").to_string(), "alice#p1");
        assert!(Permlink::is_valid_post_id("hello-world"));
        assert!(!Permlink::is_valid_post_id(""));
        assert!(!Permlink::is_valid_post_id("a:b"));
        assert!(!Permlink::is_valid_post_id("a#b"));
    }

    #[test]
    fn test_mandatory_proposal_types() {
        assert!(ProposalType::ChangeParam.requires_validator_participation());
        assert!(ProposalType::ProtocolUpgrade.requires_validator_participation());
        assert!(!ProposalType::ContentCensorship.requires_validator_participation());
    }
}
