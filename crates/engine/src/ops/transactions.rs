use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, LedgerStore, ResultEngine, Transaction, TransactionFilter};

use super::Engine;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;

/// One page of transactions plus the number of matches across all pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<S: LedgerStore> Engine<S> {
    /// Lists transactions newest first (post date, then entry date).
    ///
    /// A missing or zero `limit` means [`DEFAULT_PAGE_SIZE`]; larger values
    /// are capped at [`MAX_PAGE_SIZE`].
    pub async fn transactions(&self, mut filter: TransactionFilter) -> ResultEngine<TransactionPage> {
        let limit = match filter.limit {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(limit) => limit.min(MAX_PAGE_SIZE),
        };
        filter.limit = Some(limit);

        let total = self.store.count_transactions(&filter).await?;
        let transactions = self.store.list_transactions(&filter).await?;
        Ok(TransactionPage {
            transactions,
            total,
            limit,
            offset: filter.offset,
        })
    }

    pub async fn transaction(&self, id: Uuid) -> ResultEngine<Transaction> {
        self.store
            .get_transaction(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {id}")))
    }
}
