//! Commodities: currencies and securities referenced by accounts and
//! transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_guid};

/// Namespace used by the ledger for ISO currencies.
pub const CURRENCY_NAMESPACE: &str = "CURRENCY";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: Uuid,
    pub namespace: String,
    pub mnemonic: String,
    pub full_name: Option<String>,
    /// Smallest representable unit as a denominator (100 for cents).
    pub fraction: i32,
}

impl Commodity {
    pub fn is_currency(&self) -> bool {
        self.namespace == CURRENCY_NAMESPACE
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commodities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: String,
    pub namespace: String,
    pub mnemonic: String,
    pub fullname: Option<String>,
    pub cusip: Option<String>,
    pub fraction: i32,
    pub quote_flag: i32,
    pub quote_source: Option<String>,
    pub quote_tz: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Commodity {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_guid(&model.guid, "commodity")?,
            namespace: model.namespace,
            mnemonic: model.mnemonic,
            full_name: model.fullname,
            fraction: model.fraction,
        })
    }
}
