use crate::storage::entity::fundamental_data_type::{
    self, ActiveModel as FundamentalDataTypeActiveModel, Entity as FundamentalDataType,
    Model as FundamentalDataTypeModel,
};
use crate::storage::entity::StatementType;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryOrder, Set,
};
use std::collections::HashMap;

pub struct FundamentalDataTypeRepository;

impl FundamentalDataTypeRepository {
    pub async fn list_all<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<FundamentalDataTypeModel>, DbErr> {
        FundamentalDataType::find()
            .order_by_asc(fundamental_data_type::Column::Id)
            .all(db)
            .await
    }

    /// `(statement type, metric name) -> id` for every stored type row.
    /// When duplicates exist the lowest id wins.
    pub async fn load_catalog<C: ConnectionTrait>(
        db: &C,
    ) -> Result<HashMap<(StatementType, String), i64>, DbErr> {
        let rows = Self::list_all(db).await?;
        let mut catalog = HashMap::with_capacity(rows.len());
        for row in rows {
            catalog
                .entry((row.statement_type, row.name))
                .or_insert(row.id);
        }
        Ok(catalog)
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        statement_type: StatementType,
        name: &str,
    ) -> Result<FundamentalDataTypeModel, DbErr> {
        let am = FundamentalDataTypeActiveModel {
            id: NotSet,
            statement_type: Set(statement_type),
            name: Set(name.to_string()),
        };
        am.insert(db).await
    }

    /// Deleting a type removes every fundamental_data row that references it.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let res = FundamentalDataType::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }
}
