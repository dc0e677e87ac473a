use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_type")]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    #[sea_orm(string_value = "annuals")]
    Annuals,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
}

impl PeriodType {
    pub const ALL: [PeriodType; 2] = [PeriodType::Annuals, PeriodType::Quarterly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Annuals => "annuals",
            PeriodType::Quarterly => "quarterly",
        }
    }
}

/// Section of a financial report a metric belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "financial_statement_type"
)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    #[sea_orm(string_value = "per_share_data_array")]
    PerShareDataArray,
    #[sea_orm(string_value = "common_size_ratios")]
    CommonSizeRatios,
    #[sea_orm(string_value = "income_statement")]
    IncomeStatement,
    #[sea_orm(string_value = "balance_sheet")]
    BalanceSheet,
    #[sea_orm(string_value = "cashflow_statement")]
    CashflowStatement,
    #[sea_orm(string_value = "valuation_ratios")]
    ValuationRatios,
    #[sea_orm(string_value = "valuation_and_quality")]
    ValuationAndQuality,
    #[sea_orm(string_value = "other")]
    Other,
}

impl StatementType {
    /// Blocks read out of a fundamentals document. `Other` never appears there.
    pub const FINANCIAL_BLOCKS: [StatementType; 7] = [
        StatementType::PerShareDataArray,
        StatementType::CommonSizeRatios,
        StatementType::IncomeStatement,
        StatementType::BalanceSheet,
        StatementType::CashflowStatement,
        StatementType::ValuationRatios,
        StatementType::ValuationAndQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::PerShareDataArray => "per_share_data_array",
            StatementType::CommonSizeRatios => "common_size_ratios",
            StatementType::IncomeStatement => "income_statement",
            StatementType::BalanceSheet => "balance_sheet",
            StatementType::CashflowStatement => "cashflow_statement",
            StatementType::ValuationRatios => "valuation_ratios",
            StatementType::ValuationAndQuality => "valuation_and_quality",
            StatementType::Other => "other",
        }
    }
}
