use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EngineError, ResultEngine};

/// Number of fraction digits used by every display string.
const DISPLAY_SCALE: u32 = 2;

/// Raw rational value as stored by the ledger (`*_num` / `*_denom` columns).
///
/// A zero denominator is tolerated and reads as zero; some aggregates fall
/// back to a nominal denominator when nothing was summed, and malformed rows
/// must never make formatting fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    #[must_use]
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Exact decimal value of `numerator / denominator`.
    #[must_use]
    pub fn to_amount(self) -> Amount {
        Amount::from_rational(self.numerator, self.denominator)
    }
}

/// Exact monetary amount.
///
/// Use this type for **all** derived values in the engine (balances, bucket
/// totals, category totals) to avoid floating-point drift: repeated additions
/// of small splits stay exact.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_rational(150, 100) + Amount::from_rational(15, 10);
/// assert_eq!(amount.to_string(), "3.00");
/// assert_eq!("-2,5".parse::<Amount>().unwrap().to_string(), "-2.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Builds an amount from a ledger rational. `denominator == 0` yields zero.
    #[must_use]
    pub fn from_rational(numerator: i64, denominator: i64) -> Self {
        // Only a zero denominator can fail here: i64 / i64 always fits.
        Decimal::from(numerator)
            .checked_div(Decimal::from(denominator))
            .map_or(Self::ZERO, Self)
    }

    /// Scales the amount to `denominator`, truncating toward zero.
    ///
    /// ```rust
    /// use engine::{Amount, Rational};
    ///
    /// let amount: Amount = "12.345".parse().unwrap();
    /// assert_eq!(amount.to_rational(100).unwrap(), Rational::new(1234, 100));
    /// ```
    pub fn to_rational(self, denominator: i64) -> ResultEngine<Rational> {
        if denominator <= 0 {
            return Err(EngineError::InvalidAmount(format!(
                "denominator must be positive, got {denominator}"
            )));
        }
        let numerator = self
            .0
            .checked_mul(Decimal::from(denominator))
            .and_then(|scaled| scaled.trunc().to_i64())
            .ok_or_else(|| EngineError::InvalidAmount(format!("{self} overflows /{denominator}")))?;
        Ok(Rational::new(numerator, denominator))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn decimal(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Fixed two-decimal representation, rounding half away from zero.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_SCALE);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded.to_string()
    }
}

/// Formats a ledger rational as a fixed two-decimal string.
///
/// ```rust
/// assert_eq!(engine::to_decimal_string(150, 100), "1.50");
/// assert_eq!(engine::to_decimal_string(15, 10), "1.50");
/// assert_eq!(engine::to_decimal_string(42, 0), "0.00");
/// ```
#[must_use]
pub fn to_decimal_string(numerator: i64, denominator: i64) -> String {
    Amount::from_rational(numerator, denominator).to_decimal_string()
}

/// Adjusts a raw ledger value to the account's natural sign.
///
/// Debit-polarity accounts (assets, expenses) keep the raw sign; every other
/// account is flipped. Call it exactly once per raw value: it is not
/// idempotent.
#[must_use]
pub const fn normalize_sign(value: i64, is_debit: bool) -> i64 {
    if is_debit { value } else { value.saturating_neg() }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Rational> for Amount {
    fn from(value: Rational) -> Self {
        value.to_amount()
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(empty());
        }
        if rest.starts_with('.') || !rest.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(invalid());
        }

        let value = Decimal::from_str(&rest).map_err(|_| invalid())?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
