//! Account hierarchy resolution.
//!
//! Accounts arrive as a flat list linked by `parent_id`. The functions here
//! turn that list into a forest and answer subtree questions without
//! recursion: nodes live in an arena indexed by position, and every walk uses
//! an explicit stack plus a visited set, so malformed input (cycles, missing
//! parents, duplicate ids) still terminates.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Account, AccountClass, AccountType, Balance, QuantityTotal};

/// Classification of an account type, as used by sign rules and analytics.
pub fn classify(account_type: AccountType) -> AccountClass {
    account_type.class()
}

/// One node of the account forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNode {
    pub account: Account,
    /// Balance of this account alone, raw ledger sign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
    /// Balance of this account and all its descendants, normalized to this
    /// account's polarity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<Balance>,
    pub children: Vec<AccountNode>,
}

/// Flat accounts plus parent/child links by arena index.
#[derive(Debug)]
pub struct AccountArena {
    accounts: Vec<Account>,
    index: HashMap<Uuid, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl AccountArena {
    /// Links every account under its parent.
    ///
    /// Accounts whose parent is not part of `accounts` become extra roots, so
    /// filtered input is accepted. A later duplicate of an id is dropped. If
    /// parent links form a cycle, the first account of the cycle (in input
    /// order) is detached from its parent and promoted to root.
    pub fn new(accounts: Vec<Account>) -> Self {
        let mut unique: Vec<Account> = Vec::with_capacity(accounts.len());
        let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if index.contains_key(&account.id) {
                continue;
            }
            index.insert(account.id, unique.len());
            unique.push(account);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); unique.len()];
        let mut parents: Vec<Option<usize>> = vec![None; unique.len()];
        let mut roots: Vec<usize> = Vec::new();
        for (position, account) in unique.iter().enumerate() {
            match account.parent_id.and_then(|p| index.get(&p).copied()) {
                Some(parent) if parent != position => {
                    children[parent].push(position);
                    parents[position] = Some(parent);
                }
                _ => roots.push(position),
            }
        }

        let mut arena = Self {
            accounts: unique,
            index,
            children,
            roots,
        };
        arena.break_cycles(&parents);
        arena
    }

    fn break_cycles(&mut self, parents: &[Option<usize>]) {
        let mut visited = vec![false; self.accounts.len()];
        for &root in &self.roots {
            self.mark_reachable(root, &mut visited);
        }
        for position in 0..self.accounts.len() {
            if visited[position] {
                continue;
            }
            // Unreached accounts hang below a cycle; cut the cycle itself.
            let cut = cycle_start(position, parents);
            if let Some(parent) = parents[cut] {
                self.children[parent].retain(|&c| c != cut);
            }
            self.roots.push(cut);
            self.mark_reachable(cut, &mut visited);
        }
    }

    fn mark_reachable(&self, from: usize, visited: &mut [bool]) {
        let mut stack = vec![from];
        while let Some(position) = stack.pop() {
            if visited[position] {
                continue;
            }
            visited[position] = true;
            stack.extend(self.children[position].iter().copied());
        }
    }

    /// Pre-order walk from every root: parents come before their
    /// descendants, siblings keep input order.
    fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.accounts.len());
        let mut visited = vec![false; self.accounts.len()];
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(position) = stack.pop() {
            if visited[position] {
                continue;
            }
            visited[position] = true;
            order.push(position);
            stack.extend(self.children[position].iter().rev().copied());
        }
        order
    }

    pub fn get(&self, id: Uuid) -> Option<&Account> {
        self.index.get(&id).map(|&position| &self.accounts[position])
    }

    pub fn roots(&self) -> impl Iterator<Item = &Account> {
        self.roots.iter().map(|&position| &self.accounts[position])
    }

    /// Adds each account's own total to all of its ancestors.
    ///
    /// Accounts missing from `own` contribute nothing.
    pub fn subtree_totals(
        &self,
        own: &HashMap<Uuid, QuantityTotal>,
    ) -> HashMap<Uuid, QuantityTotal> {
        let mut totals: Vec<QuantityTotal> = self
            .accounts
            .iter()
            .map(|account| own.get(&account.id).copied().unwrap_or_default())
            .collect();
        for &position in self.preorder().iter().rev() {
            let mut sum = totals[position];
            for &child in &self.children[position] {
                sum.merge(&totals[child]);
            }
            totals[position] = sum;
        }
        self.accounts
            .iter()
            .zip(totals)
            .map(|(account, total)| (account.id, total))
            .collect()
    }

    /// Consumes the arena into owned nested nodes, without balances.
    pub fn into_forest(self) -> Vec<AccountNode> {
        let order = self.preorder();
        let mut slots: Vec<Option<Account>> = self.accounts.into_iter().map(Some).collect();
        let mut built: Vec<Option<AccountNode>> = vec![None; slots.len()];

        for &position in order.iter().rev() {
            let Some(account) = slots[position].take() else {
                continue;
            };
            let children = self.children[position]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[position] = Some(AccountNode {
                account,
                balance: None,
                total_balance: None,
                children,
            });
        }

        self.roots
            .iter()
            .filter_map(|&root| built[root].take())
            .collect()
    }
}

/// Follows parent links from `from` until one repeats and returns the
/// earliest (by input position) account of the cycle that was reached.
///
/// `from` must not reach a root: every chain from it ends in a cycle.
fn cycle_start(from: usize, parents: &[Option<usize>]) -> usize {
    let mut seen = vec![false; parents.len()];
    let mut current = from;
    while let Some(parent) = parents[current] {
        if seen[current] {
            break;
        }
        seen[current] = true;
        current = parent;
    }

    let mut earliest = current;
    let mut member = current;
    while let Some(parent) = parents[member] {
        if parent == current {
            break;
        }
        earliest = earliest.min(parent);
        member = parent;
    }
    earliest
}

/// Builds the account forest from a flat list.
pub fn build_tree(accounts: Vec<Account>) -> Vec<AccountNode> {
    AccountArena::new(accounts).into_forest()
}

/// Returns `root_id` plus every account transitively below it.
///
/// Follows raw parent links with a visited set, so it terminates on cyclic
/// data. `root_id` is always part of the result, even if it is not in
/// `accounts`.
pub fn descendant_ids(root_id: Uuid, accounts: &[Account]) -> BTreeSet<Uuid> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for account in accounts {
        if let Some(parent) = account.parent_id {
            children.entry(parent).or_default().push(account.id);
        }
    }

    let mut visited: BTreeSet<Uuid> = BTreeSet::new();
    let mut stack = vec![root_id];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().copied());
        }
    }
    visited
}

/// Colon-joined names from the top-level account down to `id`, skipping
/// ROOT accounts (`Expenses:Food:Groceries`).
pub fn account_path(id: Uuid, accounts: &[Account]) -> Option<String> {
    let by_id: HashMap<Uuid, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
    let mut names: Vec<&str> = Vec::new();
    let mut seen: BTreeSet<Uuid> = BTreeSet::new();
    let mut current = Some(*by_id.get(&id)?);
    while let Some(account) = current {
        if !seen.insert(account.id) {
            break;
        }
        if !account.is_root() {
            names.push(account.name.as_str());
        }
        current = account.parent_id.and_then(|p| by_id.get(&p).copied());
    }
    names.reverse();
    Some(names.join(":"))
}
