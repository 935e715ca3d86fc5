//! Read engine over a double-entry ledger stored in the GnuCash SQL schema.
//!
//! Amounts are exact rationals ([`Rational`], [`Amount`]); balances are
//! derived from splits on every query; reports aggregate split values by
//! month, by account and by account class.

pub use account_type::{AccountClass, AccountType};
pub use accounts::Account;
pub use amount::{Amount, Rational, normalize_sign, to_decimal_string};
pub use analytics::{
    CategoryBreakdown, CategoryTotal, IncomeExpensePeriod, IncomeExpenseReport, MonthBucket,
    NetWorthItem, NetWorthReport, month_buckets,
};
pub use balance::{Balance, DEFAULT_DENOMINATOR, QuantityTotal};
pub use commodities::{CURRENCY_NAMESPACE, Commodity};
pub use error::EngineError;
pub use hierarchy::{AccountArena, AccountNode, build_tree, classify, descendant_ids};
pub use ops::{
    AccountDetail, DEFAULT_PAGE_SIZE, Engine, EngineBuilder, MAX_PAGE_SIZE, TransactionPage,
};
pub use splits::{AccountSummary, PostedSplit, Split};
pub use store::{LedgerStore, SqlStore, TransactionFilter};
pub use transactions::Transaction;

mod account_type;
mod accounts;
mod amount;
mod analytics;
mod balance;
mod commodities;
mod error;
pub mod hierarchy;
mod ops;
mod splits;
mod store;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
