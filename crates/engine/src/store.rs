//! Read access to the ledger tables.
//!
//! [`LedgerStore`] is everything the engine needs from storage. [`SqlStore`]
//! implements it with sea-orm over the GnuCash schema; tests swap in their own
//! implementations.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    prelude::*,
    sea_query::{Expr, Func, Query},
};
use uuid::Uuid;

use crate::{
    Account, AccountType, Commodity, PostedSplit, QuantityTotal, Rational, ResultEngine, Split,
    Transaction, accounts, commodities,
    commodities::CURRENCY_NAMESPACE,
    splits, transactions,
    util::{guid_string, parse_guid},
};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions with at least one split on this account.
    pub account_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    /// `None` returns every match.
    pub limit: Option<u64>,
    pub offset: u64,
}

#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Every account, ordered by name.
    async fn list_accounts(&self) -> ResultEngine<Vec<Account>>;

    async fn get_account(&self, id: Uuid) -> ResultEngine<Option<Account>>;

    async fn list_accounts_by_type(&self, account_type: AccountType)
    -> ResultEngine<Vec<Account>>;

    /// Newest first, with splits attached.
    async fn list_transactions(&self, filter: &TransactionFilter)
    -> ResultEngine<Vec<Transaction>>;

    async fn get_transaction(&self, id: Uuid) -> ResultEngine<Option<Transaction>>;

    /// Number of transactions matching `filter`, ignoring `limit`/`offset`.
    async fn count_transactions(&self, filter: &TransactionFilter) -> ResultEngine<u64>;

    async fn list_currency_commodities(&self) -> ResultEngine<Vec<Commodity>>;

    async fn get_commodity(&self, id: Uuid) -> ResultEngine<Option<Commodity>>;

    /// Sum of split quantities posted to any of `account_ids`.
    async fn sum_split_quantities(&self, account_ids: &BTreeSet<Uuid>)
    -> ResultEngine<QuantityTotal>;

    /// Sum of split quantities for every account that has splits.
    async fn quantity_totals_by_account(&self) -> ResultEngine<HashMap<Uuid, QuantityTotal>>;

    /// Split values on `account_ids` whose transaction was posted in
    /// `[from, to)`.
    async fn list_posted_splits(
        &self,
        account_ids: &BTreeSet<Uuid>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<Vec<PostedSplit>>;
}

/// [`LedgerStore`] backed by a sea-orm connection.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Attaches splits to already loaded transactions with one query.
    async fn attach_splits(&self, txs: &mut [Transaction]) -> ResultEngine<()> {
        if txs.is_empty() {
            return Ok(());
        }
        let guids: Vec<String> = txs.iter().map(|tx| guid_string(tx.id)).collect();
        let rows = splits::Entity::find()
            .filter(splits::Column::TxGuid.is_in(guids))
            .find_also_related(accounts::Entity)
            .order_by_desc(splits::Column::ValueNum)
            .order_by_asc(splits::Column::Guid)
            .all(&self.database)
            .await?;

        let mut by_tx: HashMap<Uuid, Vec<Split>> = HashMap::new();
        for row in rows {
            let split = Split::try_from(row)?;
            by_tx.entry(split.transaction_id).or_default().push(split);
        }
        for tx in txs.iter_mut() {
            tx.splits = by_tx.remove(&tx.id).unwrap_or_default();
        }
        Ok(())
    }
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::PostDate.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::PostDate.lt(to));
        }
        if let Some(account_id) = filter.account_id {
            self = self.filter(
                transactions::Column::Guid.in_subquery(
                    Query::select()
                        .column(splits::Column::TxGuid)
                        .from(splits::Entity)
                        .and_where(splits::Column::AccountGuid.eq(guid_string(account_id)))
                        .to_owned(),
                ),
            );
        }
        if let Some(needle) = filter
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            let pattern = format!("%{}%", needle.to_lowercase());
            self = self.filter(
                Expr::expr(Func::lower(Expr::col((
                    transactions::Entity,
                    transactions::Column::Description,
                ))))
                .like(pattern),
            );
        }
        self
    }
}

fn guid_strings(ids: &BTreeSet<Uuid>) -> Vec<String> {
    ids.iter().copied().map(guid_string).collect()
}

#[async_trait::async_trait]
impl LedgerStore for SqlStore {
    async fn list_accounts(&self) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .find_also_related(commodities::Entity)
            .order_by_asc(accounts::Column::Name)
            .order_by_asc(accounts::Column::Guid)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn get_account(&self, id: Uuid) -> ResultEngine<Option<Account>> {
        accounts::Entity::find_by_id(guid_string(id))
            .find_also_related(commodities::Entity)
            .one(&self.database)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn list_accounts_by_type(
        &self,
        account_type: AccountType,
    ) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::AccountType.eq(account_type.as_str()))
            .find_also_related(commodities::Entity)
            .order_by_asc(accounts::Column::Name)
            .order_by_asc(accounts::Column::Guid)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .apply_tx_filters(filter)
            .find_also_related(commodities::Entity)
            .order_by_desc(transactions::Column::PostDate)
            .order_by_desc(transactions::Column::EnterDate)
            .order_by_desc(transactions::Column::Guid);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        if filter.offset > 0 {
            query = query.offset(filter.offset);
        }

        let mut txs = query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        self.attach_splits(&mut txs).await?;
        Ok(txs)
    }

    async fn get_transaction(&self, id: Uuid) -> ResultEngine<Option<Transaction>> {
        let Some(row) = transactions::Entity::find_by_id(guid_string(id))
            .find_also_related(commodities::Entity)
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        let mut txs = [Transaction::try_from(row)?];
        self.attach_splits(&mut txs).await?;
        let [tx] = txs;
        Ok(Some(tx))
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> ResultEngine<u64> {
        Ok(transactions::Entity::find()
            .apply_tx_filters(filter)
            .count(&self.database)
            .await?)
    }

    async fn list_currency_commodities(&self) -> ResultEngine<Vec<Commodity>> {
        commodities::Entity::find()
            .filter(commodities::Column::Namespace.eq(CURRENCY_NAMESPACE))
            .order_by_asc(commodities::Column::Mnemonic)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Commodity::try_from)
            .collect()
    }

    async fn get_commodity(&self, id: Uuid) -> ResultEngine<Option<Commodity>> {
        commodities::Entity::find_by_id(guid_string(id))
            .one(&self.database)
            .await?
            .map(Commodity::try_from)
            .transpose()
    }

    async fn sum_split_quantities(
        &self,
        account_ids: &BTreeSet<Uuid>,
    ) -> ResultEngine<QuantityTotal> {
        if account_ids.is_empty() {
            return Ok(QuantityTotal::default());
        }
        let rows: Vec<(i64, i64)> = splits::Entity::find()
            .select_only()
            .column(splits::Column::QuantityNum)
            .column(splits::Column::QuantityDenom)
            .filter(splits::Column::AccountGuid.is_in(guid_strings(account_ids)))
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn quantity_totals_by_account(&self) -> ResultEngine<HashMap<Uuid, QuantityTotal>> {
        let rows: Vec<(String, i64, i64)> = splits::Entity::find()
            .select_only()
            .column(splits::Column::AccountGuid)
            .column(splits::Column::QuantityNum)
            .column(splits::Column::QuantityDenom)
            .into_tuple()
            .all(&self.database)
            .await?;

        let mut totals: HashMap<Uuid, QuantityTotal> = HashMap::new();
        for (account_guid, numerator, denominator) in rows {
            let id = parse_guid(&account_guid, "account")?;
            totals.entry(id).or_default().add_split(numerator, denominator);
        }
        Ok(totals)
    }

    async fn list_posted_splits(
        &self,
        account_ids: &BTreeSet<Uuid>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<Vec<PostedSplit>> {
        if account_ids.is_empty() || to <= from {
            return Ok(Vec::new());
        }
        let rows: Vec<(String, DateTime<Utc>, i64, i64)> = splits::Entity::find()
            .select_only()
            .column(splits::Column::AccountGuid)
            .column(transactions::Column::PostDate)
            .column(splits::Column::ValueNum)
            .column(splits::Column::ValueDenom)
            .join(JoinType::InnerJoin, splits::Relation::Transactions.def())
            .filter(splits::Column::AccountGuid.is_in(guid_strings(account_ids)))
            .filter(transactions::Column::PostDate.gte(from))
            .filter(transactions::Column::PostDate.lt(to))
            .order_by_asc(transactions::Column::PostDate)
            .into_tuple()
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(account_guid, post_date, numerator, denominator)| {
                Ok(PostedSplit {
                    account_id: parse_guid(&account_guid, "account")?,
                    post_date,
                    value: Rational::new(numerator, denominator),
                })
            })
            .collect()
    }
}
