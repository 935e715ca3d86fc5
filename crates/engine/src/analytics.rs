//! Report types and calendar helpers for the analytics operations.
//!
//! The aggregation itself lives on [`Engine`](crate::Engine); this module only
//! holds the shapes it returns and the pure date arithmetic it relies on.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccountType, Amount};

/// One calendar month of an income/expense trend.
///
/// Covers `[start, end)`: `end` is the first day of the following month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthBucket {
    /// `YYYY-MM`
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Whole months from the one containing `start` through the one containing
/// `end`. Empty when `end < start`.
pub fn month_buckets(start: NaiveDate, end: NaiveDate) -> Vec<MonthBucket> {
    let mut buckets = Vec::new();
    if end < start {
        return buckets;
    }
    let Some(mut cursor) = start.with_day(1) else {
        return buckets;
    };
    while cursor <= end {
        let Some(next) = cursor.checked_add_months(Months::new(1)) else {
            break;
        };
        buckets.push(MonthBucket {
            year: cursor.year(),
            month: cursor.month(),
            start: cursor,
            end: next,
        });
        cursor = next;
    }
    buckets
}

/// Midnight UTC at the start of `date`.
pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC at the end of `date`, i.e. the start of the next day.
pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.succ_opt()
        .map(start_of_day)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeExpensePeriod {
    pub period: String,
    pub income: Amount,
    pub expense: Amount,
    pub net: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeExpenseReport {
    pub data: Vec<IncomeExpensePeriod>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub net_total: Amount,
    pub currency_mnemonic: Option<String>,
}

/// Absolute split total of one income or expense account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub account_id: Uuid,
    pub category: String,
    pub amount: Amount,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub currency_mnemonic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthItem {
    pub account_id: Uuid,
    pub account_name: String,
    pub account_type: AccountType,
    pub balance: Amount,
}

/// Point-in-time snapshot of assets against liabilities.
///
/// Liability balances are reported as absolute values, so
/// `net_worth = total_assets - total_liabilities`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthReport {
    pub assets: Vec<NetWorthItem>,
    pub liabilities: Vec<NetWorthItem>,
    pub total_assets: Amount,
    pub total_liabilities: Amount,
    pub net_worth: Amount,
    pub currency_mnemonic: Option<String>,
}
