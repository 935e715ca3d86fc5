use std::process::ExitCode;

use chrono::{Months, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{AccountType, Engine, TransactionFilter};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use uuid::Uuid;

use error::Result;
use settings::Settings;

mod error;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "ledgerview")]
#[command(about = "Balances and reports over a GnuCash SQL ledger")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,

    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Log level for the application and the engine.
    #[arg(long)]
    level: Option<String>,

    /// Create the ledger tables before reading.
    #[arg(long)]
    migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List accounts, optionally of one type.
    Accounts {
        #[arg(long = "type")]
        account_type: Option<AccountType>,
    },
    /// Show one account with its full name and own balance.
    Account { id: Uuid },
    /// Balance of an account.
    Balance {
        id: Uuid,
        /// Include every descendant account.
        #[arg(long)]
        rollup: bool,
    },
    /// The account tree with own and rollup balances.
    Tree,
    /// List transactions, newest first.
    Transactions(TransactionsArgs),
    /// Show one transaction with its splits.
    Transaction { id: Uuid },
    /// Currencies known to the ledger.
    Currencies,
    /// Monthly income and expense.
    IncomeExpense(RangeArgs),
    /// Income and expense totals per account.
    Categories(RangeArgs),
    /// Assets against liabilities.
    NetWorth,
}

#[derive(Args, Debug)]
struct TransactionsArgs {
    #[arg(long)]
    account: Option<Uuid>,
    /// First day included (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Case-insensitive description substring.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

/// Date range, both days inclusive. Defaults to the last month.
#[derive(Args, Debug)]
struct RangeArgs {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        let end = self.to.unwrap_or(today);
        let start = self.from.unwrap_or_else(|| {
            end.checked_sub_months(Months::new(1)).unwrap_or(end)
        });
        (start, end)
    }
}

impl From<TransactionsArgs> for TransactionFilter {
    fn from(args: TransactionsArgs) -> Self {
        Self {
            account_id: args.account,
            from: args.from.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            to: args
                .to
                .and_then(|d| d.succ_opt())
                .map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            description: args.search,
            limit: args.limit,
            offset: args.offset,
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(settings: &Settings) -> Result<Engine> {
    let db = sea_orm::Database::connect(settings.database.url.as_str()).await?;
    if settings.database.run_migrations {
        tracing::info!("running migrations");
        Migrator::up(&db, None).await?;
    }
    Ok(Engine::builder().database(db).build().await?)
}

async fn run(engine: &Engine, command: Command) -> Result<()> {
    match command {
        Command::Accounts { account_type } => print(&engine.accounts(account_type).await?),
        Command::Account { id } => print(&engine.account(id).await?),
        Command::Balance { id, rollup: false } => print(&engine.own_balance(id).await?),
        Command::Balance { id, rollup: true } => print(&engine.rollup_balance(id).await?),
        Command::Tree => print(&engine.build_hierarchy().await?),
        Command::Transactions(args) => print(&engine.transactions(args.into()).await?),
        Command::Transaction { id } => print(&engine.transaction(id).await?),
        Command::Currencies => print(&engine.currencies().await?),
        Command::IncomeExpense(range) => {
            let (start, end) = range.resolve();
            print(&engine.income_expense(start, end).await?)
        }
        Command::Categories(range) => {
            let (start, end) = range.resolve();
            print(&engine.category_breakdown(start, end).await?)
        }
        Command::NetWorth => print(&engine.net_worth().await?),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    if let Some(level) = cli.level {
        settings.app.level = level;
    }
    settings.database.run_migrations |= cli.migrate;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "ledgerview={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let engine = match connect(&settings).await {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to open ledger: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(command = ?cli.command, "running");
    match run(&engine, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
