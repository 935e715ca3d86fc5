use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Account, AccountType, Balance, Commodity, EngineError, LedgerStore, ResultEngine, hierarchy,
};

use super::Engine;

/// An account with its full name and own balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetail {
    #[serde(flatten)]
    pub account: Account,
    /// Colon-joined path, e.g. `Expenses:Food:Groceries`.
    pub full_name: String,
    pub balance: Balance,
}

impl<S: LedgerStore> Engine<S> {
    /// Lists accounts ordered by name, optionally of one type only.
    pub async fn accounts(&self, account_type: Option<AccountType>) -> ResultEngine<Vec<Account>> {
        match account_type {
            Some(account_type) => self.store.list_accounts_by_type(account_type).await,
            None => self.store.list_accounts().await,
        }
    }

    pub async fn account(&self, id: Uuid) -> ResultEngine<AccountDetail> {
        let accounts = self.store.list_accounts().await?;
        let account = accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(format!("account {id}")))?;
        let full_name = hierarchy::account_path(id, &accounts).unwrap_or_default();
        let balance = self.own_balance(id).await?;
        Ok(AccountDetail {
            account,
            full_name,
            balance,
        })
    }

    /// Full name of an account, without the ROOT account.
    pub async fn account_path(&self, id: Uuid) -> ResultEngine<String> {
        let accounts = self.store.list_accounts().await?;
        hierarchy::account_path(id, &accounts)
            .ok_or_else(|| EngineError::KeyNotFound(format!("account {id}")))
    }

    /// Commodities in the `CURRENCY` namespace, by mnemonic.
    pub async fn currencies(&self) -> ResultEngine<Vec<Commodity>> {
        self.store.list_currency_commodities().await
    }

    pub async fn commodity(&self, id: Uuid) -> ResultEngine<Commodity> {
        self.store
            .get_commodity(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("commodity {id}")))
    }

    pub(crate) async fn require_account(&self, id: Uuid) -> ResultEngine<Account> {
        self.store
            .get_account(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("account {id}")))
    }

    /// Mnemonic of the ROOT account's commodity.
    ///
    /// Reports carry it as a label only, so a lookup failure leaves it empty
    /// instead of failing the report.
    pub(crate) async fn reporting_currency(&self) -> Option<String> {
        self.store
            .list_accounts_by_type(AccountType::Root)
            .await
            .ok()?
            .into_iter()
            .find_map(|root| root.commodity_mnemonic)
    }
}
