use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./ledger.gnucash?mode=rwc";

/// Creates or resets the ledger tables.
#[derive(Parser, Debug)]
#[command(name = "migration")]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_URL)]
    database_url: String,

    #[command(subcommand)]
    step: Option<Step>,
}

#[derive(Subcommand, Debug, Default, Clone, Copy)]
enum Step {
    /// Apply every pending migration.
    #[default]
    Up,
    /// Roll back every applied migration.
    Down,
    /// Drop all tables, then apply every migration.
    Fresh,
    /// Print which migrations are applied.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter("sea_orm_migration=info,migration=info")
        .init();

    let step = cli.step.unwrap_or_default();
    tracing::info!(?step, url = %cli.database_url, "migrating ledger");
    let db = Database::connect(cli.database_url.as_str()).await?;
    match step {
        Step::Up => migration::Migrator::up(&db, None).await,
        Step::Down => migration::Migrator::down(&db, None).await,
        Step::Fresh => migration::Migrator::fresh(&db).await,
        Step::Status => migration::Migrator::status(&db).await,
    }
}
