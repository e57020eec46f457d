// crates/lino-app/src/msg.rs
//
// Transaction messages.
//
// Encoded as JSON objects tagged by `type`, e.g.
//   {"type": "donate", "username": "bob", "author": "alice", "post_id": "p1", "amount": "1.5"}
//
// Amounts are decimal LNO strings. `validate_basic` performs every check
// that needs no state; it runs before a message touches the store.

use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, Coin, LinoError, Permlink, ProposalKey, Rational};
use lino_post::PostLink;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 10_000;
pub const MAX_MEMO_LEN: usize = 100;
pub const MAX_LINKS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    /// Stake coin from the balance; registers the voter on first deposit.
    VoterDeposit { username: AccountKey, deposit: String },
    VoterWithdraw { username: AccountKey, amount: String },
    /// Return every delegation to its delegator, then withdraw the deposit.
    VoterRevoke { username: AccountKey },
    Delegate { delegator: AccountKey, voter: AccountKey, amount: String },
    DelegatorWithdraw { delegator: AccountKey, voter: AccountKey, amount: String },
    RevokeDelegation { delegator: AccountKey, voter: AccountKey },
    Vote { voter: AccountKey, proposal_id: ProposalKey, result: bool },
    CreatePost {
        author: AccountKey,
        post_id: String,
        title: String,
        content: String,
        #[serde(default)]
        parent: Option<Permlink>,
        #[serde(default)]
        source: Option<Permlink>,
        #[serde(default)]
        links: Vec<PostLink>,
        redistribution_split_rate: String,
    },
    UpdatePost {
        author: AccountKey,
        post_id: String,
        title: String,
        content: String,
        #[serde(default)]
        links: Vec<PostLink>,
    },
    DeletePost { author: AccountKey, post_id: String },
    View { username: AccountKey, author: AccountKey, post_id: String },
    ReportOrUpvote { username: AccountKey, author: AccountKey, post_id: String, is_report: bool },
    Donate {
        username: AccountKey,
        author: AccountKey,
        post_id: String,
        amount: String,
        #[serde(default)]
        from_app: Option<AccountKey>,
        #[serde(default)]
        memo: String,
    },
    DeveloperRegister { username: AccountKey, deposit: String },
}

/// Parse a strictly positive LNO amount.
pub fn parse_positive_coin(amount: &str) -> Result<Coin, LinoError> {
    let coin = Coin::parse_lno(amount)?;
    if coin.is_zero() {
        return Err(LinoError::InvalidCoin(format!("amount {:?} must be positive", amount)));
    }
    Ok(coin)
}

fn check_username(user: &AccountKey) -> Result<(), LinoError> {
    if !user.is_valid() {
        return Err(LinoError::InvalidMessage(format!("illegal username {:?}", user.as_str())));
    }
    Ok(())
}

fn check_post_id(post_id: &str) -> Result<(), LinoError> {
    if !Permlink::is_valid_post_id(post_id) {
        return Err(LinoError::InvalidMessage(format!("illegal post id {:?}", post_id)));
    }
    Ok(())
}

fn check_permlink(permlink: &Permlink) -> Result<(), LinoError> {
    check_username(&permlink.author)?;
    check_post_id(&permlink.post_id)
}

fn check_content(title: &str, content: &str, links: &[PostLink]) -> Result<(), LinoError> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(LinoError::InvalidMessage(format!("title longer than {}", MAX_TITLE_LEN)));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(LinoError::InvalidMessage(format!("content longer than {}", MAX_CONTENT_LEN)));
    }
    if links.len() > MAX_LINKS {
        return Err(LinoError::InvalidMessage(format!("more than {} links", MAX_LINKS)));
    }
    Ok(())
}

impl Msg {
    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::VoterDeposit { .. } => "voter_deposit",
            Msg::VoterWithdraw { .. } => "voter_withdraw",
            Msg::VoterRevoke { .. } => "voter_revoke",
            Msg::Delegate { .. } => "delegate",
            Msg::DelegatorWithdraw { .. } => "delegator_withdraw",
            Msg::RevokeDelegation { .. } => "revoke_delegation",
            Msg::Vote { .. } => "vote",
            Msg::CreatePost { .. } => "create_post",
            Msg::UpdatePost { .. } => "update_post",
            Msg::DeletePost { .. } => "delete_post",
            Msg::View { .. } => "view",
            Msg::ReportOrUpvote { .. } => "report_or_upvote",
            Msg::Donate { .. } => "donate",
            Msg::DeveloperRegister { .. } => "developer_register",
        }
    }

    /// Stateless validation.
    pub fn validate_basic(&self) -> Result<(), LinoError> {
        match self {
            Msg::VoterDeposit { username, deposit: amount }
            | Msg::VoterWithdraw { username, amount }
            | Msg::DeveloperRegister { username, deposit: amount } => {
                check_username(username)?;
                parse_positive_coin(amount).map(|_| ())
            }
            Msg::VoterRevoke { username } => check_username(username),
            Msg::Delegate { delegator, voter, amount }
            | Msg::DelegatorWithdraw { delegator, voter, amount } => {
                check_username(delegator)?;
                check_username(voter)?;
                parse_positive_coin(amount).map(|_| ())
            }
            Msg::RevokeDelegation { delegator, voter } => {
                check_username(delegator)?;
                check_username(voter)
            }
            Msg::Vote { voter, proposal_id, .. } => {
                check_username(voter)?;
                let id = proposal_id.0.as_str();
                if id.is_empty() || id.contains(':') {
                    return Err(LinoError::InvalidMessage(format!("illegal proposal id {:?}", id)));
                }
                Ok(())
            }
            Msg::CreatePost {
                author,
                post_id,
                title,
                content,
                parent,
                source,
                links,
                redistribution_split_rate,
            } => {
                check_username(author)?;
                check_post_id(post_id)?;
                check_content(title, content, links)?;
                if let Some(parent) = parent {
                    check_permlink(parent)?;
                }
                if let Some(source) = source {
                    check_permlink(source)?;
                }
                match Rational::from_decimal(redistribution_split_rate) {
                    Ok(rate) if rate.is_unit_interval() => Ok(()),
                    _ => Err(LinoError::InvalidSplitRate(redistribution_split_rate.clone())),
                }
            }
            Msg::UpdatePost { author, post_id, title, content, links } => {
                check_username(author)?;
                check_post_id(post_id)?;
                check_content(title, content, links)
            }
            Msg::DeletePost { author, post_id } => {
                check_username(author)?;
                check_post_id(post_id)
            }
            Msg::View { username, author, post_id }
            | Msg::ReportOrUpvote { username, author, post_id, .. } => {
                check_username(username)?;
                check_username(author)?;
                check_post_id(post_id)
            }
            Msg::Donate { username, author, post_id, amount, from_app, memo } => {
                check_username(username)?;
                check_username(author)?;
                check_post_id(post_id)?;
                if let Some(app) = from_app {
                    if !app.is_empty() {
                        check_username(app)?;
                    }
                }
                if memo.chars().count() > MAX_MEMO_LEN {
                    return Err(LinoError::InvalidMessage(format!("memo longer than {}", MAX_MEMO_LEN)));
                }
                parse_positive_coin(amount).map(|_| ())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tagged_json() {
        let msg: Msg = serde_json::from_str(
            r#"{"type":"donate","username":"bob","author":"alice","post_id":"p1","amount":"1.5"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            Msg::Donate {
                username: AccountKey::new("bob"),
                author: AccountKey::new("alice"),
                post_id: "p1".to_string(),
                amount: "1.5".to_string(),
                from_app: None,
                memo: String::new(),
            }
        );
        assert_eq!(msg.kind(), "donate");
        assert!(msg.validate_basic().is_ok());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<Msg>(r#"{"type":"mint","username":"bob"}"#).is_err());
    }

    #[test]
    fn test_validate_basic_amounts() {
        let zero = Msg::VoterDeposit {
            username: AccountKey::new("alice"),
            deposit: "0".to_string(),
        };
        assert!(matches!(zero.validate_basic(), Err(LinoError::InvalidCoin(_))));
        let garbage = Msg::Delegate {
            delegator: AccountKey::new("alice"),
            voter: AccountKey::new("bob"),
            amount: "1.234567".to_string(),
        };
        assert!(matches!(garbage.validate_basic(), Err(LinoError::InvalidCoin(_))));
    }

    #[test]
    fn test_validate_basic_names() {
        let msg = Msg::VoterRevoke {
            username: AccountKey::new("A"),
        };
        assert!(matches!(msg.validate_basic(), Err(LinoError::InvalidMessage(_))));
        let msg = Msg::DeletePost {
            author: AccountKey::new("alice"),
            post_id: "a:b".to_string(),
        };
        assert!(matches!(msg.validate_basic(), Err(LinoError::InvalidMessage(_))));
        let msg = Msg::Vote {
            voter: AccountKey::new("alice"),
            proposal_id: ProposalKey::from("1:2"),
            result: true,
        };
        assert!(matches!(msg.validate_basic(), Err(LinoError::InvalidMessage(_))));
    }

    #[test]
    fn test_validate_basic_split_rate() {
        let msg = |rate: &str| Msg::CreatePost {
            author: AccountKey::new("alice"),
            post_id: "p1".to_string(),
            title: String::new(),
            content: String::new(),
            parent: None,
            source: None,
            links: vec![],
            redistribution_split_rate: rate.to_string(),
        };
        assert!(msg("0.25").validate_basic().is_ok());
        assert!(msg("1").validate_basic().is_ok());
        assert!(matches!(msg("1.01").validate_basic(), Err(LinoError::InvalidSplitRate(_))));
        assert!(matches!(msg("x").validate_basic(), Err(LinoError::InvalidSplitRate(_))));
    }
}
