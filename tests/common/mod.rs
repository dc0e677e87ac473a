#![allow(dead_code)]

use fundamentals::storage::entity::{PeriodType, StatementType};
use fundamentals::storage::establish_connection;
use fundamentals::storage::repository::{FundamentalDataTypeRepository, NewFundamentalData};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;
use std::sync::Arc;

pub async fn test_db() -> Arc<DatabaseConnection> {
    let db = establish_connection("sqlite::memory:")
        .await
        .expect("in-memory database");
    Arc::new(db)
}

pub async fn seed_type(db: &DatabaseConnection, statement_type: StatementType, name: &str) -> i64 {
    FundamentalDataTypeRepository::insert(db, statement_type, name)
        .await
        .expect("insert type")
        .id
}

pub fn row(
    ticker: &str,
    period: PeriodType,
    year: &str,
    month: &str,
    type_id: i64,
    value: &str,
) -> NewFundamentalData {
    NewFundamentalData {
        ticker: ticker.to_string(),
        period,
        year: year.to_string(),
        month: month.to_string(),
        fundamental_data_type_id: type_id,
        value: Decimal::from_str(value).expect("decimal literal"),
    }
}
