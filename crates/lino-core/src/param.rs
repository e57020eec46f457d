// crates/lino-core/src/param.rs
//
// Read-only protocol parameters.
//
// Loaded once from genesis (or the daemon config) and handed to every
// operation through `Context`. Coin fields are in the smallest unit; rates
// are written as decimal or fraction strings ("0.05", "1/20").

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, COIN_PER_LNO};
use crate::rational::Rational;

/// Voter and delegator thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteParam {
    #[serde(default = "default_voter_min_deposit")]
    pub voter_min_deposit: Coin,
    #[serde(default = "default_voter_min_withdraw")]
    pub voter_min_withdraw: Coin,
    #[serde(default = "default_delegator_min_withdraw")]
    pub delegator_min_withdraw: Coin,
}

/// Validator eligibility thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorParam {
    #[serde(default = "default_validator_min_voting_deposit")]
    pub validator_min_voting_deposit: Coin,
}

/// Posting rate limits, in seconds of block time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostParam {
    #[serde(default = "default_post_interval_sec")]
    pub post_interval_sec: i64,
    #[serde(default = "default_report_or_upvote_interval_sec")]
    pub report_or_upvote_interval_sec: i64,
}

/// Global pool parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalParam {
    /// Fraction of every donation diverted to the inflation pool.
    #[serde(default = "default_consumption_friction_rate")]
    pub consumption_friction_rate: Rational,
    /// Delay before a registered reward event becomes due.
    #[serde(default = "default_reward_event_delay_sec")]
    pub reward_event_delay_sec: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperParam {
    #[serde(default = "default_developer_min_deposit")]
    pub developer_min_deposit: Coin,
}

/// Shape of the content-value evaluation curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateParam {
    /// Repeat donations to the same author are damped by
    /// `offset / (offset + count)`.
    #[serde(default = "default_relationship_offset")]
    pub relationship_offset: u64,
    /// Posts younger than this keep full weight.
    #[serde(default = "default_age_full_weight_sec")]
    pub age_full_weight_sec: i64,
    /// Age at which the weight bottoms out at `age_min_weight`.
    #[serde(default = "default_age_zero_sec")]
    pub age_zero_sec: i64,
    #[serde(default = "default_age_min_weight")]
    pub age_min_weight: Rational,
    /// Heavily rewarded posts are damped by `scale / (scale + total_reward)`.
    #[serde(default = "default_total_reward_scale")]
    pub total_reward_scale: Coin,
}

/// All protocol parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub vote: VoteParam,
    #[serde(default)]
    pub validator: ValidatorParam,
    #[serde(default)]
    pub post: PostParam,
    #[serde(default)]
    pub global: GlobalParam,
    #[serde(default)]
    pub developer: DeveloperParam,
    #[serde(default)]
    pub evaluate: EvaluateParam,
}

fn default_voter_min_deposit() -> Coin {
    Coin::new(2_000 * COIN_PER_LNO)
}

fn default_voter_min_withdraw() -> Coin {
    Coin::new(2 * COIN_PER_LNO)
}

fn default_delegator_min_withdraw() -> Coin {
    Coin::new(2 * COIN_PER_LNO)
}

fn default_validator_min_voting_deposit() -> Coin {
    Coin::new(300_000 * COIN_PER_LNO)
}

fn default_post_interval_sec() -> i64 {
    600
}

fn default_report_or_upvote_interval_sec() -> i64 {
    24 * 3600
}

fn default_consumption_friction_rate() -> Rational {
    Rational::new(5, 100).unwrap_or_default()
}

fn default_reward_event_delay_sec() -> i64 {
    7 * 24 * 3600
}

fn default_developer_min_deposit() -> Coin {
    Coin::new(100_000 * COIN_PER_LNO)
}

fn default_relationship_offset() -> u64 {
    5
}

fn default_age_full_weight_sec() -> i64 {
    7 * 24 * 3600
}

fn default_age_zero_sec() -> i64 {
    30 * 24 * 3600
}

fn default_age_min_weight() -> Rational {
    Rational::new(1, 10).unwrap_or_default()
}

fn default_total_reward_scale() -> Coin {
    Coin::new(10_000 * COIN_PER_LNO)
}

impl Default for VoteParam {
    fn default() -> Self {
        Self {
            voter_min_deposit: default_voter_min_deposit(),
            voter_min_withdraw: default_voter_min_withdraw(),
            delegator_min_withdraw: default_delegator_min_withdraw(),
        }
    }
}

impl Default for ValidatorParam {
    fn default() -> Self {
        Self {
            validator_min_voting_deposit: default_validator_min_voting_deposit(),
        }
    }
}

impl Default for PostParam {
    fn default() -> Self {
        Self {
            post_interval_sec: default_post_interval_sec(),
            report_or_upvote_interval_sec: default_report_or_upvote_interval_sec(),
        }
    }
}

impl Default for GlobalParam {
    fn default() -> Self {
        Self {
            consumption_friction_rate: default_consumption_friction_rate(),
            reward_event_delay_sec: default_reward_event_delay_sec(),
        }
    }
}

impl Default for DeveloperParam {
    fn default() -> Self {
        Self {
            developer_min_deposit: default_developer_min_deposit(),
        }
    }
}

impl Default for EvaluateParam {
    fn default() -> Self {
        Self {
            relationship_offset: default_relationship_offset(),
            age_full_weight_sec: default_age_full_weight_sec(),
            age_zero_sec: default_age_zero_sec(),
            age_min_weight: default_age_min_weight(),
            total_reward_scale: default_total_reward_scale(),
        }
    }
}
