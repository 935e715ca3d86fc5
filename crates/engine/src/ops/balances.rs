use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{AccountNode, Balance, LedgerStore, ResultEngine, hierarchy};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Balance of splits posted to exactly this account, in the raw ledger
    /// sign (debit positive).
    pub async fn own_balance(&self, account_id: Uuid) -> ResultEngine<Balance> {
        let account = self.require_account(account_id).await?;
        let total = self
            .store
            .sum_split_quantities(&BTreeSet::from([account_id]))
            .await?;
        Balance::raw(&account, &total)
    }

    /// Balance of the account and all its descendants, in the account's
    /// natural sign.
    pub async fn rollup_balance(&self, account_id: Uuid) -> ResultEngine<Balance> {
        let account = self.require_account(account_id).await?;
        let accounts = self.store.list_accounts().await?;
        let ids = hierarchy::descendant_ids(account_id, &accounts);
        let total = self.store.sum_split_quantities(&ids).await?;
        Balance::normalized(&account, &total)
    }

    /// The whole account forest, each node with its own and rollup balance.
    ///
    /// Runs two queries regardless of the number of accounts.
    pub async fn build_hierarchy(&self) -> ResultEngine<Vec<AccountNode>> {
        let accounts = self.store.list_accounts().await?;
        let own = self.store.quantity_totals_by_account().await?;

        let arena = hierarchy::AccountArena::new(accounts);
        let subtree = arena.subtree_totals(&own);
        let mut forest = arena.into_forest();

        let mut stack: Vec<&mut AccountNode> = forest.iter_mut().collect();
        while let Some(node) = stack.pop() {
            let id = node.account.id;
            let own_total = own.get(&id).copied().unwrap_or_default();
            let subtree_total = subtree.get(&id).copied().unwrap_or_default();
            node.balance = Some(Balance::raw(&node.account, &own_total)?);
            node.total_balance = Some(Balance::normalized(&node.account, &subtree_total)?);
            stack.extend(node.children.iter_mut());
        }
        Ok(forest)
    }
}
