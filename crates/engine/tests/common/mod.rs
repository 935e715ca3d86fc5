#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{AccountType, Engine};
use migration::MigratorTrait;
use uuid::Uuid;

fn guid() -> (Uuid, String) {
    let id = Uuid::new_v4();
    (id, id.simple().to_string())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(10, 59, 0).unwrap().and_utc()
}

/// In-memory ledger with an `EUR` currency, filled through raw inserts.
pub struct Ledger {
    pub db: DatabaseConnection,
    pub engine: Engine,
    pub eur: Uuid,
}

impl Ledger {
    pub async fn new() -> Self {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        let mut ledger = Self {
            db,
            engine,
            eur: Uuid::nil(),
        };
        ledger.eur = ledger.commodity("CURRENCY", "EUR", 100).await;
        ledger
    }

    async fn exec(&self, sql: &str, values: Vec<sea_orm::Value>) {
        let backend = self.db.get_database_backend();
        self.db
            .execute(Statement::from_sql_and_values(backend, sql, values))
            .await
            .unwrap();
    }

    pub async fn commodity(&self, namespace: &str, mnemonic: &str, fraction: i32) -> Uuid {
        let (id, guid) = guid();
        self.exec(
            "INSERT INTO commodities (guid, namespace, mnemonic, fullname, fraction) \
             VALUES (?, ?, ?, ?, ?)",
            vec![
                guid.into(),
                namespace.into(),
                mnemonic.into(),
                mnemonic.into(),
                fraction.into(),
            ],
        )
        .await;
        id
    }

    async fn insert_account(
        &self,
        name: &str,
        account_type: AccountType,
        parent: Option<Uuid>,
        placeholder: bool,
    ) -> Uuid {
        let (id, guid) = guid();
        self.exec(
            "INSERT INTO accounts \
             (guid, name, account_type, commodity_guid, commodity_scu, parent_guid, hidden, placeholder) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                guid.into(),
                name.into(),
                account_type.as_str().into(),
                self.eur.simple().to_string().into(),
                100i32.into(),
                parent.map(|p| p.simple().to_string()).into(),
                0i32.into(),
                i32::from(placeholder).into(),
            ],
        )
        .await;
        id
    }

    pub async fn root(&self) -> Uuid {
        self.insert_account("Root Account", AccountType::Root, None, false)
            .await
    }

    pub async fn account(&self, name: &str, account_type: AccountType, parent: Uuid) -> Uuid {
        self.insert_account(name, account_type, Some(parent), false)
            .await
    }

    pub async fn placeholder(&self, name: &str, account_type: AccountType, parent: Uuid) -> Uuid {
        self.insert_account(name, account_type, Some(parent), true)
            .await
    }

    /// Account whose parent guid points nowhere.
    pub async fn orphan(&self, name: &str, account_type: AccountType) -> Uuid {
        self.insert_account(name, account_type, Some(Uuid::new_v4()), false)
            .await
    }

    /// Posts a transaction; each split is `(account, value in cents)` with
    /// quantity equal to value.
    pub async fn post(
        &self,
        post_date: DateTime<Utc>,
        description: &str,
        splits: &[(Uuid, i64)],
    ) -> Uuid {
        let (tx_id, tx_guid) = guid();
        self.exec(
            "INSERT INTO transactions (guid, currency_guid, num, post_date, enter_date, description) \
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                tx_guid.clone().into(),
                self.eur.simple().to_string().into(),
                "".into(),
                post_date.into(),
                post_date.into(),
                description.into(),
            ],
        )
        .await;
        for (account, cents) in splits {
            self.split(&tx_guid, *account, (*cents, 100), (*cents, 100))
                .await;
        }
        tx_id
    }

    pub async fn split(
        &self,
        tx_guid: &str,
        account: Uuid,
        value: (i64, i64),
        quantity: (i64, i64),
    ) {
        let (_, guid) = guid();
        self.exec(
            "INSERT INTO splits \
             (guid, tx_guid, account_guid, memo, action, reconcile_state, \
              value_num, value_denom, quantity_num, quantity_denom) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                guid.into(),
                tx_guid.into(),
                account.simple().to_string().into(),
                "".into(),
                "".into(),
                "n".into(),
                value.0.into(),
                value.1.into(),
                quantity.0.into(),
                quantity.1.into(),
            ],
        )
        .await;
    }
}

/// A small household ledger:
///
/// ```text
/// Root Account (ROOT)
/// ├── Assets (ASSET, placeholder)
/// │   └── Bank (BANK)
/// ├── Liabilities (LIABILITY, placeholder)
/// │   └── Card (CREDIT)
/// ├── Income (INCOME)
/// │   └── Salary (INCOME)
/// └── Expenses (EXPENSE)
///     └── Groceries (EXPENSE)
/// ```
pub struct Household {
    pub ledger: Ledger,
    pub root: Uuid,
    pub assets: Uuid,
    pub bank: Uuid,
    pub liabilities: Uuid,
    pub card: Uuid,
    pub income: Uuid,
    pub salary: Uuid,
    pub expenses: Uuid,
    pub groceries: Uuid,
}

impl Household {
    pub async fn new() -> Self {
        let ledger = Ledger::new().await;
        let root = ledger.root().await;
        let assets = ledger.placeholder("Assets", AccountType::Asset, root).await;
        let bank = ledger.account("Bank", AccountType::Bank, assets).await;
        let liabilities = ledger
            .placeholder("Liabilities", AccountType::Liability, root)
            .await;
        let card = ledger.account("Card", AccountType::Credit, liabilities).await;
        let income = ledger.account("Income", AccountType::Income, root).await;
        let salary = ledger.account("Salary", AccountType::Income, income).await;
        let expenses = ledger.account("Expenses", AccountType::Expense, root).await;
        let groceries = ledger
            .account("Groceries", AccountType::Expense, expenses)
            .await;
        Self {
            ledger,
            root,
            assets,
            bank,
            liabilities,
            card,
            income,
            salary,
            expenses,
            groceries,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.ledger.engine
    }

    /// February 2024: salary 2000.00 into Bank, groceries 150.00 from Bank.
    pub async fn february(&self) {
        self.ledger
            .post(
                at(2024, 2, 1),
                "Salary",
                &[(self.bank, 200000), (self.salary, -200000)],
            )
            .await;
        self.ledger
            .post(
                at(2024, 2, 10),
                "Weekly groceries",
                &[(self.groceries, 15000), (self.bank, -15000)],
            )
            .await;
    }
}
