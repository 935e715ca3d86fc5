//! Transaction primitives.
//!
//! A `Transaction` is an atomic event of the ledger; it changes balances via
//! two or more [`Split`](crate::Split)s whose values sum to zero in the
//! transaction currency. The engine only reads transactions and does not check
//! that invariant.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Split,
    util::{non_empty, parse_guid},
};

use super::commodities;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub currency_id: Uuid,
    pub currency_mnemonic: Option<String>,
    /// Free-form reference number (check number, invoice id, ...).
    pub num: Option<String>,
    pub post_date: DateTime<Utc>,
    pub enter_date: DateTime<Utc>,
    pub description: Option<String>,
    pub splits: Vec<Split>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: String,
    pub currency_guid: String,
    pub num: String,
    pub post_date: DateTimeUtc,
    pub enter_date: DateTimeUtc,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commodities::Entity",
        from = "Column::CurrencyGuid",
        to = "super::commodities::Column::Guid",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Commodities,
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
}

impl Related<super::commodities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commodities.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Option<commodities::Model>)> for Transaction {
    type Error = EngineError;

    fn try_from(
        (model, currency): (Model, Option<commodities::Model>),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_guid(&model.guid, "transaction")?,
            currency_id: parse_guid(&model.currency_guid, "currency")?,
            currency_mnemonic: currency.map(|c| c.mnemonic),
            num: non_empty(model.num),
            post_date: model.post_date,
            enter_date: model.enter_date,
            description: model.description.and_then(non_empty),
            splits: Vec::new(),
        })
    }
}
