//! Account classification.
//!
//! The ledger stores the type of each account as an upper-case string
//! (`account_type` column). [`AccountType`] is the strongly typed mirror of
//! that column and the single source of the debit/credit polarity rule.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Root,
    Bank,
    Cash,
    Asset,
    Stock,
    Mutual,
    Receivable,
    Liability,
    Credit,
    Payable,
    Equity,
    Income,
    Expense,
    Currency,
    Trading,
}

/// Coarse grouping used by balance sign rules and analytics bucketing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    AssetLike,
    LiabilityLike,
    Equity,
    Income,
    Expense,
    Root,
    Other,
}

impl AccountType {
    /// Types summed as assets by the net worth snapshot.
    pub const NET_WORTH_ASSETS: [AccountType; 5] = [
        AccountType::Bank,
        AccountType::Cash,
        AccountType::Asset,
        AccountType::Stock,
        AccountType::Mutual,
    ];

    /// Types summed as liabilities by the net worth snapshot.
    pub const NET_WORTH_LIABILITIES: [AccountType; 3] = [
        AccountType::Liability,
        AccountType::Credit,
        AccountType::Payable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::Bank => "BANK",
            Self::Cash => "CASH",
            Self::Asset => "ASSET",
            Self::Stock => "STOCK",
            Self::Mutual => "MUTUAL",
            Self::Receivable => "RECEIVABLE",
            Self::Liability => "LIABILITY",
            Self::Credit => "CREDIT",
            Self::Payable => "PAYABLE",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::Currency => "CURRENCY",
            Self::Trading => "TRADING",
        }
    }

    /// `true` when a positive raw value increases the account (debit
    /// polarity). Every other type reads inverted.
    pub const fn is_debit(self) -> bool {
        matches!(
            self,
            Self::Asset
                | Self::Bank
                | Self::Cash
                | Self::Stock
                | Self::Mutual
                | Self::Receivable
                | Self::Expense
        )
    }

    pub const fn class(self) -> AccountClass {
        match self {
            Self::Bank | Self::Cash | Self::Asset | Self::Stock | Self::Mutual | Self::Receivable => {
                AccountClass::AssetLike
            }
            Self::Liability | Self::Credit | Self::Payable => AccountClass::LiabilityLike,
            Self::Equity => AccountClass::Equity,
            Self::Income => AccountClass::Income,
            Self::Expense => AccountClass::Expense,
            Self::Root => AccountClass::Root,
            Self::Currency | Self::Trading => AccountClass::Other,
        }
    }
}

impl core::fmt::Display for AccountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AccountType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ROOT" => Ok(Self::Root),
            "BANK" => Ok(Self::Bank),
            "CASH" => Ok(Self::Cash),
            "ASSET" => Ok(Self::Asset),
            "STOCK" => Ok(Self::Stock),
            "MUTUAL" => Ok(Self::Mutual),
            "RECEIVABLE" => Ok(Self::Receivable),
            "LIABILITY" => Ok(Self::Liability),
            "CREDIT" => Ok(Self::Credit),
            "PAYABLE" => Ok(Self::Payable),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            "CURRENCY" => Ok(Self::Currency),
            "TRADING" => Ok(Self::Trading),
            other => Err(EngineError::InvalidAccountType(other.to_string())),
        }
    }
}

impl core::str::FromStr for AccountType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_polarity_matches_ledger_convention() {
        let debit = [
            AccountType::Asset,
            AccountType::Bank,
            AccountType::Cash,
            AccountType::Stock,
            AccountType::Mutual,
            AccountType::Receivable,
            AccountType::Expense,
        ];
        let credit = [
            AccountType::Liability,
            AccountType::Credit,
            AccountType::Payable,
            AccountType::Equity,
            AccountType::Income,
            AccountType::Root,
            AccountType::Currency,
            AccountType::Trading,
        ];
        assert!(debit.iter().all(|t| t.is_debit()));
        assert!(credit.iter().all(|t| !t.is_debit()));
    }

    #[test]
    fn receivable_and_payable_follow_their_side() {
        assert_eq!(AccountType::Receivable.class(), AccountClass::AssetLike);
        assert_eq!(AccountType::Payable.class(), AccountClass::LiabilityLike);
        assert_eq!(AccountType::Currency.class(), AccountClass::Other);
        assert_eq!(AccountType::Root.class(), AccountClass::Root);
    }

    #[test]
    fn parses_stored_strings() {
        assert_eq!(AccountType::try_from("CREDIT").unwrap(), AccountType::Credit);
        assert_eq!(AccountType::try_from(" mutual ").unwrap(), AccountType::Mutual);
        assert_eq!(
            AccountType::try_from("SAVINGS"),
            Err(EngineError::InvalidAccountType("SAVINGS".to_string()))
        );
        for t in AccountType::NET_WORTH_ASSETS {
            assert_eq!(AccountType::try_from(t.as_str()).unwrap(), t);
        }
    }
}
