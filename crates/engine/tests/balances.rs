mod common;

use std::collections::HashMap;

use engine::{AccountNode, AccountType, EngineError, descendant_ids, normalize_sign};
use uuid::Uuid;

use common::{Household, Ledger, at};

fn flatten(forest: &[AccountNode]) -> HashMap<Uuid, &AccountNode> {
    let mut out = HashMap::new();
    let mut stack: Vec<&AccountNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        out.insert(node.account.id, node);
        stack.extend(node.children.iter());
    }
    out
}

#[tokio::test]
async fn own_balance_sums_quantities_of_the_account() {
    let house = Household::new().await;
    house.february().await;

    let bank = house.engine().own_balance(house.bank).await.unwrap();
    assert_eq!(bank.numerator, 185000);
    assert_eq!(bank.denominator, 100);
    assert_eq!(bank.amount.to_string(), "1850.00");
    assert_eq!(bank.commodity_mnemonic.as_deref(), Some("EUR"));
}

#[tokio::test]
async fn own_balance_keeps_the_raw_ledger_sign() {
    let house = Household::new().await;
    house.february().await;

    let salary = house.engine().own_balance(house.salary).await.unwrap();
    assert_eq!(salary.amount.to_string(), "-2000.00");
}

#[tokio::test]
async fn account_without_splits_has_zero_over_one_hundred() {
    let house = Household::new().await;
    let card = house.engine().own_balance(house.card).await.unwrap();
    assert_eq!((card.numerator, card.denominator), (0, 100));
    assert_eq!(card.amount.to_string(), "0.00");
}

#[tokio::test]
async fn unknown_account_is_key_not_found() {
    let house = Household::new().await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        house.engine().own_balance(missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        house.engine().rollup_balance(missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        house.engine().account_path(missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn rollup_normalizes_with_the_requested_account_polarity() {
    let house = Household::new().await;
    house.february().await;
    house
        .ledger
        .post(
            at(2024, 2, 20),
            "Bonus",
            &[(house.bank, 50000), (house.income, -50000)],
        )
        .await;

    let income = house.engine().rollup_balance(house.income).await.unwrap();
    assert_eq!(income.amount.to_string(), "2500.00");

    let expenses = house.engine().rollup_balance(house.expenses).await.unwrap();
    assert_eq!(expenses.amount.to_string(), "150.00");

    let assets = house.engine().rollup_balance(house.assets).await.unwrap();
    assert_eq!(assets.amount.to_string(), "2350.00");
}

#[tokio::test]
async fn rollup_of_root_is_the_normalized_sum_of_own_balances() {
    let house = Household::new().await;
    house.february().await;
    house
        .ledger
        .post(
            at(2024, 2, 15),
            "Card groceries",
            &[(house.groceries, 4250), (house.card, -4250)],
        )
        .await;

    let engine = house.engine();
    let accounts = engine.accounts(None).await.unwrap();
    for account in &accounts {
        let ids = descendant_ids(account.id, &accounts);
        let mut raw = 0i64;
        for id in &ids {
            raw += engine.own_balance(*id).await.unwrap().numerator;
        }
        let rollup = engine.rollup_balance(account.id).await.unwrap();
        assert_eq!(
            rollup.numerator,
            normalize_sign(raw, account.is_debit()),
            "{}",
            account.name
        );
    }

    let root = engine.rollup_balance(house.root).await.unwrap();
    assert_eq!(root.amount.to_string(), "0.00");
}

#[tokio::test]
async fn mixed_scales_report_the_largest_denominator() {
    let ledger = Ledger::new().await;
    let root = ledger.root().await;
    let broker = ledger.account("Broker", AccountType::Stock, root).await;
    let tx = ledger.post(at(2024, 3, 1), "Buy", &[]).await;
    let tx_guid = tx.simple().to_string();
    ledger.split(&tx_guid, broker, (1000, 100), (15, 10)).await;
    ledger.split(&tx_guid, broker, (500, 100), (250, 1000)).await;

    let balance = ledger.engine.own_balance(broker).await.unwrap();
    assert_eq!(balance.numerator, 265);
    assert_eq!(balance.denominator, 1000);
    assert_eq!(balance.amount.to_string(), "0.27");
}

#[tokio::test]
async fn hierarchy_carries_own_and_rollup_balances() {
    let house = Household::new().await;
    house.february().await;

    let forest = house.engine().build_hierarchy().await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].account.id, house.root);

    let nodes = flatten(&forest);
    assert_eq!(nodes.len(), 9);

    let assets = nodes[&house.assets];
    assert_eq!(assets.children.len(), 1);
    assert_eq!(assets.balance.as_ref().unwrap().amount.to_string(), "0.00");
    assert_eq!(assets.total_balance.as_ref().unwrap().amount.to_string(), "1850.00");

    let income = nodes[&house.income];
    assert_eq!(income.balance.as_ref().unwrap().amount.to_string(), "0.00");
    assert_eq!(income.total_balance.as_ref().unwrap().amount.to_string(), "2000.00");

    let salary = nodes[&house.salary];
    assert_eq!(salary.balance.as_ref().unwrap().amount.to_string(), "-2000.00");
    assert_eq!(salary.total_balance.as_ref().unwrap().amount.to_string(), "2000.00");

    for (id, node) in &nodes {
        let rollup = house.engine().rollup_balance(*id).await.unwrap();
        assert_eq!(node.total_balance.as_ref(), Some(&rollup));
    }
}

#[tokio::test]
async fn hierarchy_promotes_orphans_to_roots() {
    let house = Household::new().await;
    let orphan = house
        .ledger
        .orphan("Lost", AccountType::Expense)
        .await;

    let forest = house.engine().build_hierarchy().await.unwrap();
    let roots: Vec<Uuid> = forest.iter().map(|n| n.account.id).collect();
    assert_eq!(roots.len(), 2);
    assert!(roots.contains(&house.root));
    assert!(roots.contains(&orphan));
}

#[tokio::test]
async fn account_detail_has_full_name_and_balance() {
    let house = Household::new().await;
    house.february().await;

    let detail = house.engine().account(house.groceries).await.unwrap();
    assert_eq!(detail.full_name, "Expenses:Groceries");
    assert_eq!(detail.balance.amount.to_string(), "150.00");
    assert_eq!(detail.account.parent_id, Some(house.expenses));

    assert_eq!(
        house.engine().account_path(house.bank).await.unwrap(),
        "Assets:Bank"
    );
}

#[tokio::test]
async fn accounts_filter_by_type() {
    let house = Household::new().await;

    let expenses = house
        .engine()
        .accounts(Some(AccountType::Expense))
        .await
        .unwrap();
    let names: Vec<&str> = expenses.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Expenses", "Groceries"]);

    let all = house.engine().accounts(None).await.unwrap();
    assert_eq!(all.len(), 9);
    assert!(all.windows(2).all(|w| w[0].name <= w[1].name));
}
