// crates/lino-core/src/traits.rs
//
// Contracts the settlement pipeline and message handlers need from the
// surrounding ledgers. Each method runs inside a message `Context`; reads
// take it shared, writes take it exclusively and only stage their effects.

use crate::coin::Coin;
use crate::error::LinoError;
use crate::rational::Rational;
use crate::state::Context;
use crate::types::{AccountKey, DonationKind, Permlink, RewardEvent};

/// Account balances, activity timestamps, and donation relationships.
///
/// Implemented by lino-account.
pub trait AccountLedger {
    fn does_account_exist(&self, ctx: &Context, key: &AccountKey) -> Result<bool, LinoError>;

    /// Debit `coin` from the account's saving balance.
    ///
    /// # Errors
    /// `InsufficientBalance` if the balance is smaller than `coin`.
    fn minus_balance(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError>;

    fn add_balance(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError>;

    /// Bump the author's lifetime direct-deposit counter.
    fn add_direct_deposit(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError>;

    fn get_last_post_at(&self, ctx: &Context, key: &AccountKey) -> Result<i64, LinoError>;

    fn update_last_post_at(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError>;

    fn get_last_report_or_upvote_at(&self, ctx: &Context, key: &AccountKey) -> Result<i64, LinoError>;

    fn update_last_report_or_upvote_at(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError>;

    fn update_last_activity(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError>;

    /// Number of donations `consumer` has made to `author` so far.
    fn get_donation_relationship(
        &self,
        ctx: &Context,
        consumer: &AccountKey,
        author: &AccountKey,
    ) -> Result<u64, LinoError>;

    fn increment_donation_relationship(
        &self,
        ctx: &mut Context,
        consumer: &AccountKey,
        author: &AccountKey,
    ) -> Result<(), LinoError>;
}

/// Post records and their donation / report / upvote ledgers.
///
/// Implemented by lino-post.
pub trait PostLedger {
    fn does_post_exist(&self, ctx: &Context, permlink: &Permlink) -> Result<bool, LinoError>;

    fn is_deleted(&self, ctx: &Context, permlink: &Permlink) -> Result<bool, LinoError>;

    /// The post this one was derived from, if any.
    fn get_source_post(&self, ctx: &Context, permlink: &Permlink) -> Result<Option<Permlink>, LinoError>;

    fn get_redistribution_split_rate(&self, ctx: &Context, permlink: &Permlink) -> Result<Rational, LinoError>;

    fn add_donation(
        &self,
        ctx: &mut Context,
        permlink: &Permlink,
        consumer: &AccountKey,
        coin: Coin,
        kind: DonationKind,
    ) -> Result<(), LinoError>;

    /// `(created_at, total_reward)` of the post.
    fn get_created_time_and_total_reward(&self, ctx: &Context, permlink: &Permlink) -> Result<(i64, Coin), LinoError>;

    /// Record `stake` as the account's report or upvote weight on the post,
    /// replacing any weight it recorded earlier.
    fn report_or_upvote(
        &self,
        ctx: &mut Context,
        permlink: &Permlink,
        user: &AccountKey,
        stake: Coin,
        is_report: bool,
    ) -> Result<(), LinoError>;
}

/// Protocol-wide consumption accounting and the inflation pool.
///
/// Implemented by lino-global.
pub trait GlobalPool {
    fn get_consumption_friction_rate(&self, ctx: &Context) -> Result<Rational, LinoError>;

    fn add_consumption(&self, ctx: &mut Context, coin: Coin) -> Result<(), LinoError>;

    /// Content-value weight of one donation. Pure in its inputs.
    fn evaluate_consumption(
        &self,
        ctx: &Context,
        coin: Coin,
        relationship_count: u64,
        created_at: i64,
        total_reward: Coin,
    ) -> Result<Coin, LinoError>;

    /// Move `friction` into the inflation pool and queue `event` for deferred
    /// reward distribution.
    fn add_friction_and_register_reward_event(
        &self,
        ctx: &mut Context,
        event: RewardEvent,
        friction: Coin,
        evaluate: Coin,
    ) -> Result<(), LinoError>;
}

/// Stake weight behind an account's reports and upvotes.
///
/// Implemented by lino-vote.
pub trait StakeLedger {
    /// The account's current voting power: its voter deposit plus the power
    /// delegated to it. Zero for an account that is not a voter.
    fn get_voting_power(&self, ctx: &Context, key: &AccountKey) -> Result<Coin, LinoError>;
}

/// Registered applications that donations may be attributed to.
///
/// Implemented by lino-account.
pub trait DeveloperRegistry {
    fn does_developer_exist(&self, ctx: &Context, key: &AccountKey) -> Result<bool, LinoError>;
}
