// crates/lino-global/src/evaluate.rs
//
// Content-value evaluation of a single donation.
//
// The evaluated value starts at the donated amount and is damped three times,
// each step truncating toward zero:
//
//   1. relationship:  offset / (offset + prior_donations_to_author)
//   2. post age:      1 until `age_full_weight_sec`, then linear down to
//                     `age_min_weight` at `age_zero_sec`, flat afterwards
//   3. total reward:  scale / (scale + post_total_reward)
//
// Integer-only so that every replica agrees on the result.

use lino_core::{Coin, EvaluateParam, LinoError, Rational};

fn relationship_factor(param: &EvaluateParam, relationship_count: u64) -> Result<Rational, LinoError> {
    if param.relationship_offset == 0 {
        return Ok(Rational::one());
    }
    let den = param
        .relationship_offset
        .checked_add(relationship_count)
        .ok_or_else(|| LinoError::ArithmeticInvariantViolation("relationship count overflow".to_string()))?;
    Rational::new(param.relationship_offset, den)
}

fn age_factor(param: &EvaluateParam, age_sec: i64) -> Result<Rational, LinoError> {
    if age_sec <= param.age_full_weight_sec {
        return Ok(Rational::one());
    }
    if age_sec >= param.age_zero_sec || param.age_zero_sec <= param.age_full_weight_sec {
        return Ok(param.age_min_weight);
    }
    let min = param.age_min_weight;
    if !min.is_unit_interval() {
        return Err(LinoError::ArithmeticInvariantViolation(format!(
            "age min weight {} exceeds 1",
            min
        )));
    }
    let mut elapsed = (age_sec - param.age_full_weight_sec) as u64;
    let mut span = (param.age_zero_sec - param.age_full_weight_sec) as u64;
    let (num, den) = (min.numerator() as u128, min.denominator() as u128);
    // factor = 1 - (1 - min) * elapsed / span
    //        = (span*den - (den-num)*elapsed) / (span*den)
    // Coarsen the time axis until span*den fits in a u64.
    while span as u128 * den > u64::MAX as u128 {
        span >>= 1;
        elapsed >>= 1;
    }
    let total = span as u128 * den;
    let decay = (den - num) * elapsed as u128;
    let to_u64 = |v: u128| {
        u64::try_from(v).map_err(|_| LinoError::ArithmeticInvariantViolation("age factor overflow".to_string()))
    };
    Rational::new(to_u64(total - decay)?, to_u64(total)?)
}

fn total_reward_factor(param: &EvaluateParam, total_reward: Coin) -> Result<Rational, LinoError> {
    if param.total_reward_scale.is_zero() {
        return Ok(Rational::one());
    }
    let den = param.total_reward_scale.plus(total_reward)?;
    Rational::new(param.total_reward_scale.amount, den.amount)
}

/// Evaluate one donation of `coin`.
///
/// `now` is the current block time; `created_at` the post's creation time.
pub fn evaluate_consumption(
    param: &EvaluateParam,
    coin: Coin,
    relationship_count: u64,
    created_at: i64,
    now: i64,
    total_reward: Coin,
) -> Result<Coin, LinoError> {
    let age = now.saturating_sub(created_at).max(0);
    let after_relationship = relationship_factor(param, relationship_count)?.mul_coin(coin)?;
    let after_age = age_factor(param, age)?.mul_coin(after_relationship)?;
    total_reward_factor(param, total_reward)?.mul_coin(after_age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param() -> EvaluateParam {
        EvaluateParam {
            relationship_offset: 5,
            age_full_weight_sec: 100,
            age_zero_sec: 1_100,
            age_min_weight: Rational::new(1, 10).unwrap(),
            total_reward_scale: Coin::new(1_000),
        }
    }

    #[test]
    fn test_fresh_post_first_donation_keeps_full_value() {
        let value = evaluate_consumption(&param(), Coin::new(1_000), 0, 0, 50, Coin::zero()).unwrap();
        assert_eq!(value, Coin::new(1_000));
    }

    #[test]
    fn test_repeat_donations_are_damped() {
        // 5 / (5 + 5) = 1/2
        let value = evaluate_consumption(&param(), Coin::new(1_000), 5, 0, 0, Coin::zero()).unwrap();
        assert_eq!(value, Coin::new(500));
    }

    #[test]
    fn test_age_decay_is_linear_then_flat() {
        // Halfway through the decay window: 1 - 0.9 * 0.5 = 0.55
        let mid = evaluate_consumption(&param(), Coin::new(1_000), 0, 0, 600, Coin::zero()).unwrap();
        assert_eq!(mid, Coin::new(550));
        let old = evaluate_consumption(&param(), Coin::new(1_000), 0, 0, 10_000, Coin::zero()).unwrap();
        assert_eq!(old, Coin::new(100));
    }

    #[test]
    fn test_total_reward_damping() {
        // 1000 / (1000 + 3000) = 1/4
        let value = evaluate_consumption(&param(), Coin::new(1_000), 0, 0, 0, Coin::new(3_000)).unwrap();
        assert_eq!(value, Coin::new(250));
    }

    #[test]
    fn test_never_exceeds_donation() {
        for count in [0u64, 1, 10, 1_000] {
            for now in [0i64, 100, 500, 5_000] {
                let value =
                    evaluate_consumption(&param(), Coin::new(777), count, 0, now, Coin::new(5)).unwrap();
                assert!(value.amount <= 777);
            }
        }
    }

    #[test]
    fn test_created_in_future_counts_as_fresh() {
        let value = evaluate_consumption(&param(), Coin::new(10), 0, 500, 0, Coin::zero()).unwrap();
        assert_eq!(value, Coin::new(10));
    }

    #[test]
    fn test_wide_age_window_with_fine_min_weight() {
        let wide = EvaluateParam {
            age_full_weight_sec: 0,
            age_zero_sec: i64::MAX,
            age_min_weight: Rational::from_decimal("0.123456789").unwrap(),
            ..param()
        };
        // Halfway: 1 - 0.876543211 * 0.5 = 0.5617283945
        let value =
            evaluate_consumption(&wide, Coin::new(1_000_000_000), 0, 0, i64::MAX / 2, Coin::zero()).unwrap();
        assert!(value.amount >= 561_728_000 && value.amount <= 561_729_000, "{}", value);
    }
}
