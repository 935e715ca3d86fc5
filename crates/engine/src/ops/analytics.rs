use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{
    Account, AccountType, Amount, Balance, EngineError, LedgerStore, ResultEngine,
    analytics::{
        CategoryBreakdown, CategoryTotal, IncomeExpensePeriod, IncomeExpenseReport, NetWorthItem,
        NetWorthReport, end_of_day, month_buckets, start_of_day,
    },
};

use super::Engine;

fn checked_add(acc: Amount, amount: Amount) -> ResultEngine<Amount> {
    acc.checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount("aggregate overflow".to_string()))
}

fn checked_sub(acc: Amount, amount: Amount) -> ResultEngine<Amount> {
    acc.checked_sub(amount)
        .ok_or_else(|| EngineError::InvalidAmount("aggregate overflow".to_string()))
}

fn ids(accounts: &[Account]) -> BTreeSet<Uuid> {
    accounts.iter().map(|a| a.id).collect()
}

#[derive(Clone, Copy, Default)]
struct PeriodTotals {
    income: Amount,
    expense: Amount,
}

impl<S: LedgerStore> Engine<S> {
    /// Monthly income and expense from the month of `start` through the month
    /// of `end`, both inclusive.
    ///
    /// Values are absolute split values in the transaction currency. Months
    /// without activity are reported with zero amounts. `end < start` yields
    /// an empty report.
    pub async fn income_expense(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<IncomeExpenseReport> {
        let currency_mnemonic = self.reporting_currency().await;
        let buckets = month_buckets(start, end);
        let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
            return Ok(IncomeExpenseReport {
                data: Vec::new(),
                total_income: Amount::ZERO,
                total_expense: Amount::ZERO,
                net_total: Amount::ZERO,
                currency_mnemonic,
            });
        };

        let income_ids = ids(&self.store.list_accounts_by_type(AccountType::Income).await?);
        let expense_ids = ids(&self.store.list_accounts_by_type(AccountType::Expense).await?);
        let all_ids: BTreeSet<Uuid> = income_ids.union(&expense_ids).copied().collect();

        let posted = self
            .store
            .list_posted_splits(&all_ids, start_of_day(first.start), start_of_day(last.end))
            .await?;

        let origin = first.year * 12 + first.month as i32;
        let mut totals = vec![PeriodTotals::default(); buckets.len()];
        for split in posted {
            let date = split.post_date.date_naive();
            let index = date.year() * 12 + date.month() as i32 - origin;
            let Some(slot) = usize::try_from(index).ok().and_then(|i| totals.get_mut(i)) else {
                continue;
            };
            let amount = split.value.to_amount().abs();
            if income_ids.contains(&split.account_id) {
                slot.income = checked_add(slot.income, amount)?;
            } else if expense_ids.contains(&split.account_id) {
                slot.expense = checked_add(slot.expense, amount)?;
            }
        }

        let mut data = Vec::with_capacity(buckets.len());
        let mut total_income = Amount::ZERO;
        let mut total_expense = Amount::ZERO;
        for (bucket, slot) in buckets.iter().zip(totals) {
            total_income = checked_add(total_income, slot.income)?;
            total_expense = checked_add(total_expense, slot.expense)?;
            data.push(IncomeExpensePeriod {
                period: bucket.period(),
                income: slot.income,
                expense: slot.expense,
                net: checked_sub(slot.income, slot.expense)?,
            });
        }

        Ok(IncomeExpenseReport {
            data,
            total_income,
            total_expense,
            net_total: checked_sub(total_income, total_expense)?,
            currency_mnemonic,
        })
    }

    /// Absolute split totals per income and expense account over the whole
    /// days `start..=end`.
    ///
    /// One entry per account, so accounts sharing a name under different
    /// parents stay separate. Accounts with a zero total are left out.
    pub async fn category_breakdown(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<CategoryBreakdown> {
        let currency_mnemonic = self.reporting_currency().await;
        if end < start {
            return Ok(CategoryBreakdown {
                income: Vec::new(),
                expense: Vec::new(),
                total_income: Amount::ZERO,
                total_expense: Amount::ZERO,
                currency_mnemonic,
            });
        }

        let income_accounts = self.store.list_accounts_by_type(AccountType::Income).await?;
        let expense_accounts = self.store.list_accounts_by_type(AccountType::Expense).await?;
        let all_ids: BTreeSet<Uuid> = income_accounts
            .iter()
            .chain(expense_accounts.iter())
            .map(|a| a.id)
            .collect();

        let posted = self
            .store
            .list_posted_splits(&all_ids, start_of_day(start), end_of_day(end))
            .await?;

        let mut per_account: HashMap<Uuid, (Amount, u64)> = HashMap::new();
        for split in posted {
            let entry = per_account.entry(split.account_id).or_default();
            entry.0 = checked_add(entry.0, split.value.to_amount().abs())?;
            entry.1 += 1;
        }

        let (income, total_income) = category_totals(income_accounts, &per_account)?;
        let (expense, total_expense) = category_totals(expense_accounts, &per_account)?;
        Ok(CategoryBreakdown {
            income,
            expense,
            total_income,
            total_expense,
            currency_mnemonic,
        })
    }

    /// Current assets against liabilities.
    ///
    /// Uses each account's own balance. Placeholder accounts and zero
    /// balances are skipped; liabilities are reported as absolute values.
    pub async fn net_worth(&self) -> ResultEngine<NetWorthReport> {
        let currency_mnemonic = self.reporting_currency().await;
        let accounts = self.store.list_accounts().await?;
        let own = self.store.quantity_totals_by_account().await?;

        let mut assets = Vec::new();
        let mut liabilities = Vec::new();
        let mut total_assets = Amount::ZERO;
        let mut total_liabilities = Amount::ZERO;

        for account in &accounts {
            let is_asset = AccountType::NET_WORTH_ASSETS.contains(&account.account_type);
            let is_liability = AccountType::NET_WORTH_LIABILITIES.contains(&account.account_type);
            if account.placeholder || !(is_asset || is_liability) {
                continue;
            }
            let total = own.get(&account.id).copied().unwrap_or_default();
            let balance = Balance::raw(account, &total)?;
            if balance.is_zero() {
                continue;
            }
            let item = |balance: Amount| NetWorthItem {
                account_id: account.id,
                account_name: account.name.clone(),
                account_type: account.account_type,
                balance,
            };
            if is_asset {
                total_assets = checked_add(total_assets, balance.amount)?;
                assets.push(item(balance.amount));
            } else {
                let amount = balance.amount.abs();
                total_liabilities = checked_add(total_liabilities, amount)?;
                liabilities.push(item(amount));
            }
        }

        let by_name = |a: &NetWorthItem, b: &NetWorthItem| {
            a.account_name
                .cmp(&b.account_name)
                .then(a.account_id.cmp(&b.account_id))
        };
        assets.sort_by(by_name);
        liabilities.sort_by(by_name);

        Ok(NetWorthReport {
            assets,
            liabilities,
            total_assets,
            total_liabilities,
            net_worth: checked_sub(total_assets, total_liabilities)?,
            currency_mnemonic,
        })
    }
}

fn category_totals(
    mut accounts: Vec<Account>,
    per_account: &HashMap<Uuid, (Amount, u64)>,
) -> ResultEngine<(Vec<CategoryTotal>, Amount)> {
    accounts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let mut out = Vec::new();
    let mut total = Amount::ZERO;
    for account in accounts {
        let Some(&(amount, count)) = per_account.get(&account.id) else {
            continue;
        };
        if amount.is_zero() {
            continue;
        }
        total = checked_add(total, amount)?;
        out.push(CategoryTotal {
            account_id: account.id,
            category: account.name,
            amount,
            count,
        });
    }
    Ok((out, total))
}
