//! The module contains the `Account` struct and its storage model.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AccountClass, AccountType, EngineError,
    util::{parse_guid, parse_optional_guid},
};

use super::commodities;

/// An account of the ledger.
///
/// Accounts form a tree through `parent_id`; only roots have no parent.
/// Balances are never stored here: they are derived on every query (see
/// [`Balance`](crate::Balance)).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<Uuid>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub hidden: bool,
    /// Structural-only node, excluded from balance totals.
    pub placeholder: bool,
    pub commodity_id: Option<Uuid>,
    pub commodity_scu: i32,
    /// Mnemonic of `commodity_id`, resolved by join.
    pub commodity_mnemonic: Option<String>,
}

impl Account {
    pub fn is_debit(&self) -> bool {
        self.account_type.is_debit()
    }

    pub fn class(&self) -> AccountClass {
        self.account_type.class()
    }

    pub fn is_root(&self) -> bool {
        self.account_type == AccountType::Root
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: String,
    pub name: String,
    pub account_type: String,
    pub commodity_guid: Option<String>,
    pub commodity_scu: i32,
    pub non_std_scu: i32,
    pub parent_guid: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub hidden: Option<i32>,
    pub placeholder: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commodities::Entity",
        from = "Column::CommodityGuid",
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

impl TryFrom<(Model, Option<commodities::Model>)> for Account {
    type Error = EngineError;

    fn try_from(
        (model, commodity): (Model, Option<commodities::Model>),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_guid(&model.guid, "account")?,
            name: model.name,
            account_type: AccountType::try_from(model.account_type.as_str())?,
            parent_id: parse_optional_guid(model.parent_guid.as_deref(), "parent account")?,
            code: model.code.filter(|c| !c.trim().is_empty()),
            description: model.description.filter(|d| !d.trim().is_empty()),
            hidden: model.hidden.unwrap_or(0) != 0,
            placeholder: model.placeholder.unwrap_or(0) != 0,
            commodity_id: parse_optional_guid(model.commodity_guid.as_deref(), "commodity")?,
            commodity_scu: model.commodity_scu,
            commodity_mnemonic: commodity.map(|c| c.mnemonic),
        })
    }
}
