use sea_orm_migration::prelude::*;

/// Creates the ledger tables with the column names and types of the GnuCash
/// SQL backend, so an engine pointed at a GnuCash database and one pointed at
/// a freshly migrated database read the same schema.
///
/// GnuCash declares no foreign keys; neither does this migration.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commodities::Table)
                    .if_not_exists()
                    .col(guid(Commodities::Guid).primary_key())
                    .col(ColumnDef::new(Commodities::Namespace).string_len(2048).not_null())
                    .col(ColumnDef::new(Commodities::Mnemonic).string_len(2048).not_null())
                    .col(ColumnDef::new(Commodities::Fullname).string_len(2048))
                    .col(ColumnDef::new(Commodities::Cusip).string_len(2048))
                    .col(ColumnDef::new(Commodities::Fraction).integer().not_null())
                    .col(
                        ColumnDef::new(Commodities::QuoteFlag)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Commodities::QuoteSource).string_len(2048))
                    .col(ColumnDef::new(Commodities::QuoteTz).string_len(2048))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(guid(Accounts::Guid).primary_key())
                    .col(ColumnDef::new(Accounts::Name).string_len(2048).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(2048).not_null())
                    .col(ColumnDef::new(Accounts::CommodityGuid).string_len(32))
                    .col(ColumnDef::new(Accounts::CommodityScu).integer().not_null())
                    .col(
                        ColumnDef::new(Accounts::NonStdScu)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::ParentGuid).string_len(32))
                    .col(ColumnDef::new(Accounts::Code).string_len(2048))
                    .col(ColumnDef::new(Accounts::Description).string_len(2048))
                    .col(ColumnDef::new(Accounts::Hidden).integer())
                    .col(ColumnDef::new(Accounts::Placeholder).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(guid(Transactions::Guid).primary_key())
                    .col(guid(Transactions::CurrencyGuid))
                    .col(
                        ColumnDef::new(Transactions::Num)
                            .string_len(2048)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Transactions::PostDate).timestamp().not_null())
                    .col(ColumnDef::new(Transactions::EnterDate).timestamp().not_null())
                    .col(ColumnDef::new(Transactions::Description).string_len(2048))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("tx_post_date_index")
                    .table(Transactions::Table)
                    .col(Transactions::PostDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Splits::Table)
                    .if_not_exists()
                    .col(guid(Splits::Guid).primary_key())
                    .col(guid(Splits::TxGuid))
                    .col(guid(Splits::AccountGuid))
                    .col(
                        ColumnDef::new(Splits::Memo)
                            .string_len(2048)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Splits::Action)
                            .string_len(2048)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Splits::ReconcileState)
                            .string_len(1)
                            .not_null()
                            .default("n"),
                    )
                    .col(ColumnDef::new(Splits::ReconcileDate).timestamp())
                    .col(ColumnDef::new(Splits::ValueNum).big_integer().not_null())
                    .col(ColumnDef::new(Splits::ValueDenom).big_integer().not_null())
                    .col(ColumnDef::new(Splits::QuantityNum).big_integer().not_null())
                    .col(ColumnDef::new(Splits::QuantityDenom).big_integer().not_null())
                    .col(ColumnDef::new(Splits::LotGuid).string_len(32))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("splits_tx_guid_index")
                    .table(Splits::Table)
                    .col(Splits::TxGuid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("splits_account_guid_index")
                    .table(Splits::Table)
                    .col(Splits::AccountGuid)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Splits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commodities::Table).to_owned())
            .await
    }
}

/// GUID column: 32 hex digits, required.
fn guid<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).string_len(32).not_null().to_owned()
}

#[derive(Iden)]
enum Commodities {
    Table,
    Guid,
    Namespace,
    Mnemonic,
    Fullname,
    Cusip,
    Fraction,
    QuoteFlag,
    QuoteSource,
    QuoteTz,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Guid,
    Name,
    AccountType,
    CommodityGuid,
    CommodityScu,
    NonStdScu,
    ParentGuid,
    Code,
    Description,
    Hidden,
    Placeholder,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Guid,
    CurrencyGuid,
    Num,
    PostDate,
    EnterDate,
    Description,
}

#[derive(Iden)]
enum Splits {
    Table,
    Guid,
    TxGuid,
    AccountGuid,
    Memo,
    Action,
    ReconcileState,
    ReconcileDate,
    ValueNum,
    ValueDenom,
    QuantityNum,
    QuantityDenom,
    LotGuid,
}
