//! Derived balances.
//!
//! Nothing here is persisted: a [`Balance`] is rebuilt from split quantities
//! on every query so it always matches the live ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Account, Amount, EngineError, Rational, ResultEngine, normalize_sign};

/// Denominator reported when an account has no splits at all.
pub const DEFAULT_DENOMINATOR: i64 = 100;

/// Raw aggregate of split quantities over a set of accounts.
///
/// The numerator is summed in `i128` and only narrowed when a [`Balance`] is
/// built. The denominator is the largest one observed: splits of one account
/// share the commodity scale in well-formed data, so this only picks a scale
/// to report and does not reconcile differing ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantityTotal {
    pub numerator: i128,
    pub max_denominator: Option<i64>,
    pub count: u64,
}

impl QuantityTotal {
    pub fn add_split(&mut self, numerator: i64, denominator: i64) {
        self.numerator += i128::from(numerator);
        self.max_denominator = Some(
            self.max_denominator
                .map_or(denominator, |current| current.max(denominator)),
        );
        self.count += 1;
    }

    pub fn merge(&mut self, other: &QuantityTotal) {
        self.numerator += other.numerator;
        self.max_denominator = match (self.max_denominator, other.max_denominator) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.count += other.count;
    }

    pub fn denominator(&self) -> i64 {
        self.max_denominator.unwrap_or(DEFAULT_DENOMINATOR)
    }

    /// Narrows the total to the ledger's `i64` rational.
    pub fn to_rational(&self) -> ResultEngine<Rational> {
        let numerator = i64::try_from(self.numerator).map_err(|_| {
            EngineError::InvalidAmount(format!("balance overflow: {}", self.numerator))
        })?;
        Ok(Rational::new(numerator, self.denominator()))
    }
}

impl FromIterator<(i64, i64)> for QuantityTotal {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        let mut total = QuantityTotal::default();
        for (numerator, denominator) in iter {
            total.add_split(numerator, denominator);
        }
        total
    }
}

/// Balance of one account, in the account's own commodity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub account_id: Uuid,
    pub numerator: i64,
    pub denominator: i64,
    /// `numerator / denominator`, serialized as a two-decimal string.
    pub amount: Amount,
    pub commodity_mnemonic: Option<String>,
}

impl Balance {
    /// Balance in the raw ledger sign (debit positive).
    pub fn raw(account: &Account, total: &QuantityTotal) -> ResultEngine<Self> {
        let rational = total.to_rational()?;
        Ok(Self::from_rational(account, rational))
    }

    /// Balance in the account's natural sign: the raw sum is normalized once,
    /// with the polarity of `account`, whatever the types of the accounts
    /// that contributed to `total`.
    pub fn normalized(account: &Account, total: &QuantityTotal) -> ResultEngine<Self> {
        let rational = total.to_rational()?;
        Ok(Self::from_rational(
            account,
            Rational::new(
                normalize_sign(rational.numerator, account.is_debit()),
                rational.denominator,
            ),
        ))
    }

    fn from_rational(account: &Account, rational: Rational) -> Self {
        Self {
            account_id: account.id,
            numerator: rational.numerator,
            denominator: rational.denominator,
            amount: rational.to_amount(),
            commodity_mnemonic: account.commodity_mnemonic.clone(),
        }
    }

    pub fn rational(&self) -> Rational {
        Rational::new(self.numerator, self.denominator)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountType;

    fn account(account_type: AccountType) -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            account_type,
            parent_id: None,
            code: None,
            description: None,
            hidden: false,
            placeholder: false,
            commodity_id: None,
            commodity_scu: 100,
            commodity_mnemonic: Some("EUR".to_string()),
        }
    }

    #[test]
    fn empty_total_defaults_to_nominal_denominator() {
        let balance = Balance::raw(&account(AccountType::Bank), &QuantityTotal::default()).unwrap();
        assert_eq!(balance.numerator, 0);
        assert_eq!(balance.denominator, DEFAULT_DENOMINATOR);
        assert_eq!(balance.amount.to_string(), "0.00");
    }

    #[test]
    fn total_keeps_the_largest_denominator() {
        let total: QuantityTotal = [(100, 100), (5, 1000), (-3, 10)].into_iter().collect();
        assert_eq!(total.numerator, 102);
        assert_eq!(total.denominator(), 1000);
        assert_eq!(total.count, 3);
    }

    #[test]
    fn merge_combines_counts_and_scales() {
        let mut a: QuantityTotal = [(100, 100)].into_iter().collect();
        let b: QuantityTotal = [(7, 1000), (1, 1000)].into_iter().collect();
        a.merge(&b);
        a.merge(&QuantityTotal::default());
        assert_eq!(a.numerator, 108);
        assert_eq!(a.max_denominator, Some(1000));
        assert_eq!(a.count, 3);
    }

    #[test]
    fn normalized_uses_the_requested_account_polarity() {
        let total: QuantityTotal = [(-250000, 100)].into_iter().collect();
        let income = Balance::normalized(&account(AccountType::Income), &total).unwrap();
        assert_eq!(income.amount.to_string(), "2500.00");
        let bank = Balance::normalized(&account(AccountType::Bank), &total).unwrap();
        assert_eq!(bank.amount.to_string(), "-2500.00");
        assert_eq!(bank.commodity_mnemonic.as_deref(), Some("EUR"));
    }

    #[test]
    fn overflowing_total_is_reported() {
        let total = QuantityTotal {
            numerator: i128::from(i64::MAX) + 1,
            max_denominator: Some(100),
            count: 2,
        };
        assert!(matches!(
            Balance::raw(&account(AccountType::Bank), &total),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
