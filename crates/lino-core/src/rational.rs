// crates/lino-core/src/rational.rs
//
// Exact non-negative rational numbers for rate splits.
//
// Rates (friction rate, redistribution split rate, evaluation dampers) are
// kept as reduced integer fractions. Applying a rate to a Coin truncates
// toward zero, so a split never credits more than was allotted: for any coin
// `c` and rate `r <= 1`, `r.mul_coin(c) + (c - r.mul_coin(c)) == c`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coin::Coin;
use crate::error::LinoError;

/// Maximum number of fractional digits accepted when parsing a decimal rate.
pub const DECIMAL_PRECISION: usize = 9;

/// A reduced fraction `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rational {
    num: u64,
    den: u64,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    /// Build a reduced fraction. Fails if `den` is zero.
    pub fn new(num: u64, den: u64) -> Result<Self, LinoError> {
        if den == 0 {
            return Err(LinoError::ArithmeticInvariantViolation(
                "rational with zero denominator".to_string(),
            ));
        }
        let g = gcd(num, den).max(1);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    pub const fn one() -> Self {
        Self { num: 1, den: 1 }
    }

    pub fn numerator(&self) -> u64 {
        self.num
    }

    pub fn denominator(&self) -> u64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// True when `0 <= self <= 1`.
    pub fn is_unit_interval(&self) -> bool {
        self.num <= self.den
    }

    /// Parse a decimal string such as `"0.25"` or `"1"` exactly.
    pub fn from_decimal(s: &str) -> Result<Self, LinoError> {
        let invalid = || LinoError::InvalidMessage(format!("cannot parse rational {:?}", s));
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty()
            || frac.len() > DECIMAL_PRECISION
            || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let den = 10u64.pow(frac.len() as u32);
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac: u64 = if frac.is_empty() { 0 } else { frac.parse().map_err(|_| invalid())? };
        let num = whole
            .checked_mul(den)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;
        Self::new(num, den)
    }

    /// `1 - self`. Only defined on the unit interval.
    pub fn one_minus(&self) -> Result<Self, LinoError> {
        if !self.is_unit_interval() {
            return Err(LinoError::ArithmeticInvariantViolation(format!(
                "1 - {} is negative",
                self
            )));
        }
        Self::new(self.den - self.num, self.den)
    }

    /// Product of two rationals, reduced.
    pub fn mul(&self, other: &Rational) -> Result<Self, LinoError> {
        let num = self.num as u128 * other.num as u128;
        let den = self.den as u128 * other.den as u128;
        let g = {
            let (mut a, mut b) = (num, den);
            while b != 0 {
                let t = a % b;
                a = b;
                b = t;
            }
            a.max(1)
        };
        let (num, den) = (num / g, den / g);
        match (u64::try_from(num), u64::try_from(den)) {
            (Ok(n), Ok(d)) => Self::new(n, d),
            _ => Err(LinoError::ArithmeticInvariantViolation(format!(
                "{} * {} does not fit",
                self, other
            ))),
        }
    }

    /// `floor(coin * self)`.
    pub fn mul_coin(&self, coin: Coin) -> Result<Coin, LinoError> {
        let product = coin.amount as u128 * self.num as u128 / self.den as u128;
        u64::try_from(product).map(Coin::new).map_err(|_| {
            LinoError::ArithmeticInvariantViolation(format!("{} * {} overflows", coin, self))
        })
    }

    /// Split `coin` into `(floor(coin * self), remainder)`. The two parts
    /// always sum to `coin`.
    pub fn split_coin(&self, coin: Coin) -> Result<(Coin, Coin), LinoError> {
        if !self.is_unit_interval() {
            return Err(LinoError::ArithmeticInvariantViolation(format!(
                "split rate {} exceeds 1",
                self
            )));
        }
        let part = self.mul_coin(coin)?;
        Ok((part, coin.minus(part)?))
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = LinoError;

    /// Accepts either `"num/den"` or a decimal string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((n, d)) => {
                let invalid = || LinoError::InvalidMessage(format!("cannot parse rational {:?}", s));
                let n: u64 = n.trim().parse().map_err(|_| invalid())?;
                let d: u64 = d.trim().parse().map_err(|_| invalid())?;
                if d == 0 {
                    return Err(invalid());
                }
                Self::new(n, d)
            }
            None => Self::from_decimal(s),
        }
    }
}

impl TryFrom<String> for Rational {
    type Error = LinoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rational> for String {
    fn from(r: Rational) -> Self {
        r.to_string()
    }
}
