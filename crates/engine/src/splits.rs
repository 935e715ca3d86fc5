//! Transaction splits.
//!
//! A [`Split`] is one leg of a double-entry transaction, posted to exactly one
//! account. It carries two rationals:
//! - `value`, in the transaction currency,
//! - `quantity`, in the account commodity.
//!
//! They differ whenever the account commodity is not the transaction currency
//! (e.g. buying shares). Balances sum quantities; analytics sum values.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AccountType, Amount, EngineError, Rational,
    util::{non_empty, parse_guid},
};

use super::accounts;

/// Account fields attached to a split read with its transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub account_type: AccountType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub memo: Option<String>,
    pub action: Option<String>,
    /// Reconciliation code as stored (`n`, `c`, `y`, ...).
    pub reconcile_state: String,
    pub value: Rational,
    pub quantity: Rational,
    pub account: Option<AccountSummary>,
}

impl Split {
    pub fn value_amount(&self) -> Amount {
        self.value.to_amount()
    }

    pub fn quantity_amount(&self) -> Amount {
        self.quantity.to_amount()
    }
}

/// A split value together with the post date of its transaction.
///
/// This is the unit the analytics aggregate over: one row per split, already
/// restricted to an account set and a date window by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostedSplit {
    pub account_id: Uuid,
    pub post_date: DateTime<Utc>,
    pub value: Rational,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: String,
    pub tx_guid: String,
    pub account_guid: String,
    pub memo: String,
    pub action: String,
    pub reconcile_state: String,
    pub reconcile_date: Option<DateTimeUtc>,
    pub value_num: i64,
    pub value_denom: i64,
    pub quantity_num: i64,
    pub quantity_denom: i64,
    pub lot_guid: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TxGuid",
        to = "super::transactions::Column::Guid",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountGuid",
        to = "super::accounts::Column::Guid",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Option<accounts::Model>)> for Split {
    type Error = EngineError;

    fn try_from((model, account): (Model, Option<accounts::Model>)) -> Result<Self, Self::Error> {
        let account = account
            .map(|a| -> Result<AccountSummary, EngineError> {
                Ok(AccountSummary {
                    id: parse_guid(&a.guid, "account")?,
                    account_type: AccountType::try_from(a.account_type.as_str())?,
                    name: a.name,
                })
            })
            .transpose()?;

        Ok(Self {
            id: parse_guid(&model.guid, "split")?,
            transaction_id: parse_guid(&model.tx_guid, "transaction")?,
            account_id: parse_guid(&model.account_guid, "account")?,
            memo: non_empty(model.memo),
            action: non_empty(model.action),
            reconcile_state: model.reconcile_state,
            value: Rational::new(model.value_num, model.value_denom),
            quantity: Rational::new(model.quantity_num, model.quantity_denom),
            account,
        })
    }
}
