use sea_orm::DatabaseConnection;

use crate::{LedgerStore, ResultEngine, SqlStore};

mod accounts;
mod analytics;
mod balances;
mod transactions;

pub use accounts::AccountDetail;
pub use transactions::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, TransactionPage};

/// Read engine over a ledger.
///
/// Every operation takes `&self` and only reads, so one engine can be shared
/// (e.g. behind an `Arc`) by any number of concurrent callers. Dropping a
/// returned future abandons its pending queries.
#[derive(Debug)]
pub struct Engine<S = SqlStore> {
    store: S,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S: LedgerStore> Engine<S> {
    /// Engine over any [`LedgerStore`].
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, checking that the database answers.
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            store: SqlStore::new(self.database),
        })
    }
}
