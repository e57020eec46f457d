// crates/lino-core/src/error.rs

use thiserror::Error;

/// Protocol-wide error type for the Lino ledger.
///
/// Every state-machine operation returns this instead of panicking. The
/// message-dispatch boundary turns the first error into a rejected
/// transaction and discards all staged writes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinoError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Post already exists: {0}")]
    PostAlreadyExists(String),

    /// The post has been deleted; deletion is terminal.
    #[error("Post deleted: {0}")]
    PostDeleted(String),

    #[error("Insufficient deposit: {0}")]
    InsufficientDeposit(String),

    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Zero or unparsable amount where a positive amount is required.
    #[error("Invalid coin: {0}")]
    InvalidCoin(String),

    #[error("Voter not found: {0}")]
    VoterNotFound(String),

    #[error("Delegation not found: {0}")]
    DelegationNotFound(String),

    #[error("Vote not found: {0}")]
    VoteNotFound(String),

    #[error("Vote already exists: {0}")]
    VoteAlreadyExists(String),

    /// Withdraw rejected by the voter/delegator legality rules.
    #[error("Illegal withdraw: {0}")]
    IllegalWithdraw(String),

    #[error("Self donation forbidden: {0}")]
    SelfDonationForbidden(String),

    #[error("Developer not found: {0}")]
    DeveloperNotFound(String),

    #[error("Developer already exists: {0}")]
    DeveloperAlreadyExists(String),

    /// Post or report/upvote interval has not elapsed.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid redistribution split rate: {0}")]
    InvalidSplitRate(String),

    /// Stateless validation of a message failed.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A computation would create value or drive a balance negative.
    /// Never reachable through valid protocol paths.
    #[error("Arithmetic invariant violation: {0}")]
    ArithmeticInvariantViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LinoError {
    /// Stable numeric code reported in a rejected-transaction result.
    pub fn code(&self) -> u32 {
        match self {
            LinoError::AccountNotFound(_) => 101,
            LinoError::AccountAlreadyExists(_) => 102,
            LinoError::InsufficientBalance(_) => 103,
            LinoError::PostNotFound(_) => 201,
            LinoError::PostAlreadyExists(_) => 202,
            LinoError::PostDeleted(_) => 203,
            LinoError::SelfDonationForbidden(_) => 204,
            LinoError::RateLimited(_) => 205,
            LinoError::InvalidSplitRate(_) => 206,
            LinoError::InsufficientDeposit(_) => 301,
            LinoError::InvalidCoin(_) => 302,
            LinoError::VoterNotFound(_) => 303,
            LinoError::DelegationNotFound(_) => 304,
            LinoError::VoteNotFound(_) => 305,
            LinoError::VoteAlreadyExists(_) => 306,
            LinoError::IllegalWithdraw(_) => 307,
            LinoError::DeveloperNotFound(_) => 401,
            LinoError::DeveloperAlreadyExists(_) => 402,
            LinoError::InvalidMessage(_) => 501,
            LinoError::ArithmeticInvariantViolation(_) => 901,
            LinoError::Storage(_) => 902,
            LinoError::Serialization(_) => 903,
        }
    }
}

impl From<serde_json::Error> for LinoError {
    fn from(e: serde_json::Error) -> Self {
        LinoError::Serialization(e.to_string())
    }
}
