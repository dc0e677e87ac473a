use super::sea_orm_active_enums::StatementType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fundamental_data_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "type")]
    pub statement_type: StatementType,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fundamental_data::Entity")]
    FundamentalData,
}

impl Related<super::fundamental_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundamentalData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
