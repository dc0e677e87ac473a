use super::sea_orm_active_enums::PeriodType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fundamental_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub ticker: String,
    pub period: PeriodType,
    #[sea_orm(column_type = "String(StringLen::N(5))")]
    pub year: String,
    #[sea_orm(column_type = "String(StringLen::N(3))")]
    pub month: String,
    pub fundamental_data_type_id: i64,
    #[sea_orm(column_type = "Decimal(None)")]
    pub value: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fundamental_data_type::Entity",
        from = "Column::FundamentalDataTypeId",
        to = "super::fundamental_data_type::Column::Id",
        on_delete = "Cascade"
    )]
    FundamentalDataType,
}

impl Related<super::fundamental_data_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundamentalDataType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
