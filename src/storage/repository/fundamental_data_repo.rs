use crate::storage::entity::fundamental_data::{
    self, ActiveModel as FundamentalDataActiveModel, Column as FundamentalDataColumn,
    Entity as FundamentalData, Model as FundamentalDataModel,
};
use crate::storage::entity::fundamental_data_type::{
    self, Entity as FundamentalDataType, Model as FundamentalDataTypeModel,
};
use crate::storage::entity::{PeriodType, StatementType};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Rows per INSERT statement. Keeps a statement under the bind-parameter limits of
/// both PostgreSQL (65535) and SQLite (32766).
pub const INSERT_CHUNK_ROWS: usize = 1_000;

pub struct FundamentalDataRepository;

/// Optional filters for a ticker lookup. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalDataFilter {
    pub period: Option<PeriodType>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub statement_type: Option<StatementType>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFundamentalData {
    pub ticker: String,
    pub period: PeriodType,
    pub year: String,
    pub month: String,
    pub fundamental_data_type_id: i64,
    pub value: Decimal,
}

impl NewFundamentalData {
    fn into_active_model(self) -> FundamentalDataActiveModel {
        FundamentalDataActiveModel {
            id: NotSet,
            ticker: Set(self.ticker),
            period: Set(self.period),
            year: Set(self.year),
            month: Set(self.month),
            fundamental_data_type_id: Set(self.fundamental_data_type_id),
            value: Set(self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct AvailabilityRow {
    pub period: PeriodType,
    pub year: String,
    pub month: String,
}

impl FundamentalDataRepository {
    pub async fn find_by_ticker(
        db: &DatabaseConnection,
        ticker: &str,
        filter: &FundamentalDataFilter,
    ) -> Result<Vec<(FundamentalDataModel, FundamentalDataTypeModel)>, DbErr> {
        let mut query = FundamentalData::find()
            .find_also_related(FundamentalDataType)
            .filter(FundamentalDataColumn::Ticker.eq(ticker));

        if let Some(period) = filter.period {
            query = query.filter(FundamentalDataColumn::Period.eq(period));
        }
        if let Some(year) = filter.year.as_deref() {
            query = query.filter(FundamentalDataColumn::Year.eq(year));
        }
        if let Some(month) = filter.month.as_deref() {
            query = query.filter(FundamentalDataColumn::Month.eq(month));
        }
        if let Some(statement_type) = filter.statement_type {
            query = query
                .filter(fundamental_data_type::Column::StatementType.eq(statement_type));
        }
        if let Some(name) = filter.name.as_deref() {
            query = query.filter(fundamental_data_type::Column::Name.eq(name));
        }

        let rows = query
            .order_by_asc(FundamentalDataColumn::Id)
            .all(db)
            .await?;

        // The foreign key is NOT NULL, so the type row is always present.
        Ok(rows
            .into_iter()
            .filter_map(|(data, data_type)| data_type.map(|t| (data, t)))
            .collect())
    }

    pub async fn distinct_tickers(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        FundamentalData::find()
            .select_only()
            .column(FundamentalDataColumn::Ticker)
            .distinct()
            .order_by_asc(FundamentalDataColumn::Ticker)
            .into_tuple::<String>()
            .all(db)
            .await
    }

    /// Distinct `(period, year, month)` combinations stored for a ticker.
    pub async fn availability(
        db: &DatabaseConnection,
        ticker: &str,
    ) -> Result<Vec<AvailabilityRow>, DbErr> {
        FundamentalData::find()
            .select_only()
            .column(FundamentalDataColumn::Period)
            .column(FundamentalDataColumn::Year)
            .column(FundamentalDataColumn::Month)
            .filter(FundamentalDataColumn::Ticker.eq(ticker))
            .group_by(FundamentalDataColumn::Period)
            .group_by(FundamentalDataColumn::Year)
            .group_by(FundamentalDataColumn::Month)
            .order_by_asc(FundamentalDataColumn::Period)
            .order_by_asc(FundamentalDataColumn::Year)
            .order_by_asc(FundamentalDataColumn::Month)
            .into_model::<AvailabilityRow>()
            .all(db)
            .await
    }

    pub async fn insert_one<C: ConnectionTrait>(
        db: &C,
        row: NewFundamentalData,
    ) -> Result<FundamentalDataModel, DbErr> {
        row.into_active_model().insert(db).await
    }

    /// Inserts all rows in one transaction. Rows that collide with an existing
    /// `(ticker, period, year, month, fundamental_data_type_id)` are dropped.
    /// Returns the number of rows actually written.
    pub async fn insert_batch_ignore_conflicts(
        db: &DatabaseConnection,
        rows: Vec<NewFundamentalData>,
    ) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let txn = db.begin().await?;
        let mut inserted = 0u64;
        let mut rows = rows.into_iter().peekable();

        while rows.peek().is_some() {
            let chunk: Vec<FundamentalDataActiveModel> = rows
                .by_ref()
                .take(INSERT_CHUNK_ROWS)
                .map(NewFundamentalData::into_active_model)
                .collect();

            inserted += FundamentalData::insert_many(chunk)
                .on_conflict(
                    OnConflict::columns([
                        fundamental_data::Column::Ticker,
                        fundamental_data::Column::Period,
                        fundamental_data::Column::Year,
                        fundamental_data::Column::Month,
                        fundamental_data::Column::FundamentalDataTypeId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(inserted)
    }
}
