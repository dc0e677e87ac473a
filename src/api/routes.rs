//! HTTP routes for the fundamentals service.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::ApiError;
use super::AppState;
use crate::storage::entity::fundamental_data::Model as FundamentalDataModel;
use crate::storage::entity::fundamental_data_type::Model as FundamentalDataTypeModel;
use crate::storage::entity::{PeriodType, StatementType};
use crate::storage::repository::{
    FundamentalDataFilter, FundamentalDataRepository, FundamentalDataTypeRepository,
};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundamentalDataTypeResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub statement_type: StatementType,
    pub name: String,
}

impl From<FundamentalDataTypeModel> for FundamentalDataTypeResponse {
    fn from(model: FundamentalDataTypeModel) -> Self {
        Self {
            id: model.id,
            statement_type: model.statement_type,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundamentalDataResponse {
    pub id: i64,
    pub ticker: String,
    pub period: PeriodType,
    pub year: String,
    pub month: String,
    pub fundamental_data_type_id: i64,
    pub value: f64,
    pub data_type: FundamentalDataTypeResponse,
}

impl From<(FundamentalDataModel, FundamentalDataTypeModel)> for FundamentalDataResponse {
    fn from((data, data_type): (FundamentalDataModel, FundamentalDataTypeModel)) -> Self {
        Self {
            id: data.id,
            ticker: data.ticker,
            period: data.period,
            year: data.year,
            month: data.month,
            fundamental_data_type_id: data.fundamental_data_type_id,
            value: data.value.to_f64().unwrap_or_default(),
            data_type: data_type.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodSlot {
    pub year: String,
    pub month: String,
}

/// Keyed by period; periods without data are absent.
pub type AvailabilityResponse = BTreeMap<PeriodType, Vec<PeriodSlot>>;

/// Optional filters for `/fundamental-data/:ticker`. Empty strings are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundamentalDataQuery {
    pub period: Option<PeriodType>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub statement_type: Option<StatementType>,
    pub name: Option<String>,
}

impl From<FundamentalDataQuery> for FundamentalDataFilter {
    fn from(q: FundamentalDataQuery) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            period: q.period,
            year: non_empty(q.year),
            month: non_empty(q.month),
            statement_type: q.statement_type,
            name: non_empty(q.name),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// All metric definitions.
pub async fn list_fundamental_data_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FundamentalDataTypeResponse>>, ApiError> {
    let rows = FundamentalDataTypeRepository::list_all(state.db.as_ref()).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Values stored for one ticker, each with its metric definition.
pub async fn get_fundamental_data(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    query: Result<Query<FundamentalDataQuery>, QueryRejection>,
) -> Result<Json<Vec<FundamentalDataResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let filter = FundamentalDataFilter::from(query);

    let rows = FundamentalDataRepository::find_by_ticker(state.db.as_ref(), &ticker, &filter).await?;
    if rows.is_empty() {
        return Err(ApiError::no_data_for_ticker());
    }

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_tickers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let tickers = FundamentalDataRepository::distinct_tickers(state.db.as_ref()).await?;
    Ok(Json(tickers))
}

/// Which `(period, year, month)` combinations exist for a ticker.
pub async fn get_ticker_availability(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let rows = FundamentalDataRepository::availability(state.db.as_ref(), &ticker).await?;
    if rows.is_empty() {
        return Err(ApiError::no_data_for_ticker());
    }

    let mut availability = AvailabilityResponse::new();
    for row in rows {
        let slots = availability.entry(row.period).or_default();
        let slot = PeriodSlot {
            year: row.year,
            month: row.month,
        };
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }

    Ok(Json(availability))
}
