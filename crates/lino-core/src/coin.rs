// crates/lino-core/src/coin.rs
//
// The LNO coin type.
//
// The smallest unit is the "coin". 1 LNO = 10^5 coin. All ledger accounting is
// done in integer coin; there is no floating-point path anywhere in the state
// machine, because every replica must compute bit-identical balances.
//
// Unlike a plain `u64`, `Coin` never wraps or saturates silently: `plus` and
// `minus` return `LinoError::ArithmeticInvariantViolation` on overflow or
// underflow. Callers are expected to check sufficiency first, so that error
// only ever surfaces from a bug.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LinoError;

/// Number of coin in one LNO. 1 LNO = 10^5 coin.
pub const COIN_PER_LNO: u64 = 100_000;

/// An LNO amount, stored in the smallest denomination.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coin {
    pub amount: u64,
}

impl Coin {
    /// Zero coin.
    pub const fn zero() -> Self {
        Self { amount: 0 }
    }

    /// Create a Coin from a raw amount in the smallest unit.
    pub const fn new(amount: u64) -> Self {
        Self { amount }
    }

    /// Create a Coin from a whole LNO value.
    ///
    /// # Errors
    /// Returns `ArithmeticInvariantViolation` if the value does not fit.
    pub fn from_lno(lno: u64) -> Result<Self, LinoError> {
        lno.checked_mul(COIN_PER_LNO)
            .map(Self::new)
            .ok_or_else(|| LinoError::ArithmeticInvariantViolation(format!("{} LNO overflows", lno)))
    }

    /// Parse a decimal LNO string such as `"12.5"` into coin.
    ///
    /// At most five fractional digits are accepted; anything finer than one
    /// coin cannot be represented and is rejected rather than rounded.
    pub fn parse_lno(s: &str) -> Result<Self, LinoError> {
        let invalid = || LinoError::InvalidCoin(format!("cannot parse LNO amount {:?}", s));
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 5 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let frac_units: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<5}", frac).parse().map_err(|_| invalid())?
        };
        Self::from_lno(whole)?.plus(Coin::new(frac_units))
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// `self >= other`.
    pub fn is_gte(&self, other: Coin) -> bool {
        self.amount >= other.amount
    }

    /// Checked addition.
    pub fn plus(self, other: Coin) -> Result<Coin, LinoError> {
        self.amount.checked_add(other.amount).map(Coin::new).ok_or_else(|| {
            LinoError::ArithmeticInvariantViolation(format!("{} + {} overflows", self, other))
        })
    }

    /// Checked subtraction. A negative result is never produced.
    pub fn minus(self, other: Coin) -> Result<Coin, LinoError> {
        self.amount.checked_sub(other.amount).map(Coin::new).ok_or_else(|| {
            LinoError::ArithmeticInvariantViolation(format!("{} - {} is negative", self, other))
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.amount / COIN_PER_LNO;
        let frac = self.amount % COIN_PER_LNO;
        if frac == 0 {
            write!(f, "{} LNO", whole)
        } else {
            let frac_str = format!("{:05}", frac);
            write!(f, "{}.{} LNO", whole, frac_str.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lno() {
        assert_eq!(Coin::from_lno(3).unwrap().amount, 300_000);
        assert!(Coin::from_lno(u64::MAX).is_err());
    }

    #[test]
    fn test_parse_lno() {
        assert_eq!(Coin::parse_lno("1").unwrap(), Coin::new(100_000));
        assert_eq!(Coin::parse_lno("1.5").unwrap(), Coin::new(150_000));
        assert_eq!(Coin::parse_lno("0.00001").unwrap(), Coin::new(1));
        assert_eq!(Coin::parse_lno(".25").unwrap(), Coin::new(25_000));
    }

    #[test]
    fn test_parse_lno_rejects_garbage() {
        assert!(Coin::parse_lno("").is_err());
        assert!(Coin::parse_lno("-1").is_err());
        assert!(Coin::parse_lno("1.000001").is_err());
        assert!(Coin::parse_lno("1e5").is_err());
    }

    #[test]
    fn test_minus_underflow_is_rejected() {
        let err = Coin::new(5).minus(Coin::new(6)).unwrap_err();
        assert!(matches!(err, LinoError::ArithmeticInvariantViolation(_)));
        assert_eq!(Coin::new(6).minus(Coin::new(6)).unwrap(), Coin::zero());
    }

    #[test]
    fn test_plus_overflow_is_rejected() {
        assert!(Coin::new(u64::MAX).plus(Coin::new(1)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Coin::new(100_000).to_string(), "1 LNO");
        assert_eq!(Coin::new(150_000).to_string(), "1.5 LNO");
        assert_eq!(Coin::zero().to_string(), "0 LNO");
    }
}
