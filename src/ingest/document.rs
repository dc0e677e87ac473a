//! Shape of a per-ticker fundamentals document and the rules for turning it into rows.
//!
//! ```json
//! {"financials": {"annuals": {"Fiscal Year": ["2022-03", "2023-03", "TTM"],
//!                             "income_statement": {"Revenue": ["10", "N/A", "12"]}},
//!                 "quarterly": {...}}}
//! ```

use crate::storage::entity::{PeriodType, StatementType};
use crate::storage::repository::NewFundamentalData;
use log::warn;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

pub const MAX_TICKER_LEN: usize = 30;
pub const MAX_YEAR_LEN: usize = 5;
pub const MAX_MONTH_LEN: usize = 3;
pub const MAX_METRIC_NAME_LEN: usize = 50;

const MISSING_MARKERS: [&str; 3] = ["N/A", "-", ""];
const TRAILING_TWELVE_MONTHS: &str = "TTM";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundamentalsDocument {
    pub financials: Option<Financials>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Financials {
    pub annuals: Option<PeriodBlock>,
    pub quarterly: Option<PeriodBlock>,
}

impl Financials {
    pub fn periods(&self) -> impl Iterator<Item = (PeriodType, &PeriodBlock)> {
        [
            (PeriodType::Annuals, self.annuals.as_ref()),
            (PeriodType::Quarterly, self.quarterly.as_ref()),
        ]
        .into_iter()
        .filter_map(|(period, block)| block.map(|b| (period, b)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodBlock {
    #[serde(rename = "Fiscal Year", default)]
    pub fiscal_years: Vec<Value>,
    #[serde(flatten)]
    pub blocks: HashMap<String, Value>,
}

impl PeriodBlock {
    /// Metric name -> per-fiscal-year values, for one statement block.
    pub fn metrics(&self, block: StatementType) -> Option<&Map<String, Value>> {
        self.blocks.get(block.as_str()).and_then(Value::as_object)
    }
}

/// Distinct metric names per statement block.
pub type MetricNames = BTreeMap<StatementType, BTreeSet<String>>;

/// `(statement type, metric name) -> fundamental_data_type.id`.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    ids: HashMap<(StatementType, String), i64>,
}

impl MetricCatalog {
    pub fn new(ids: HashMap<(StatementType, String), i64>) -> Self {
        Self { ids }
    }

    pub fn get(&self, block: StatementType, name: &str) -> Option<i64> {
        self.ids.get(&(block, name.to_string())).copied()
    }

    pub fn contains(&self, block: StatementType, name: &str) -> bool {
        self.get(block, name).is_some()
    }

    pub fn insert(&mut self, block: StatementType, name: String, id: i64) {
        self.ids.insert((block, name), id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of reading one raw metric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    /// Missing markers, non-numeric text, booleans and non-finite numbers.
    Missing,
    Number(Decimal),
    /// A finite number that `Decimal` cannot hold.
    OutOfRange,
}

impl ParsedValue {
    pub fn number(self) -> Option<Decimal> {
        match self {
            ParsedValue::Number(d) => Some(d),
            _ => None,
        }
    }
}

pub fn parse_value(raw: &Value) -> ParsedValue {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return ParsedValue::Number(Decimal::from(i));
            }
            match n.as_f64().filter(|f| f.is_finite()) {
                Some(f) => {
                    Decimal::from_f64(f).map_or(ParsedValue::OutOfRange, ParsedValue::Number)
                }
                None => ParsedValue::Missing,
            }
        }
        Value::String(s) => {
            if MISSING_MARKERS.contains(&s.as_str()) {
                return ParsedValue::Missing;
            }
            let t = s.trim();
            let Some(f) = t.parse::<f64>().ok().filter(|f| f.is_finite()) else {
                return ParsedValue::Missing;
            };
            Decimal::from_str(t)
                .ok()
                .or_else(|| Decimal::from_f64(f))
                .map_or(ParsedValue::OutOfRange, ParsedValue::Number)
        }
        _ => ParsedValue::Missing,
    }
}

/// Splits a fiscal-year label such as `"2023-03"` into `("2023", "03")`.
/// `"TTM"`, empty labels and labels without a dash carry no period.
pub fn split_fiscal_year(label: &Value) -> Option<(String, String)> {
    let label = label.as_str()?;
    if label.is_empty() || label == TRAILING_TWELVE_MONTHS || !label.contains('-') {
        return None;
    }
    let mut parts = label.split('-');
    let year = parts.next()?;
    let month = parts.next()?;
    if year.is_empty() {
        return None;
    }
    Some((year.to_string(), month.to_string()))
}

/// Adds every metric name found in `doc` to `names`.
pub fn collect_metric_names(doc: &FundamentalsDocument, names: &mut MetricNames) {
    let Some(financials) = doc.financials.as_ref() else {
        return;
    };
    for (_, period_block) in financials.periods() {
        for block in StatementType::FINANCIAL_BLOCKS {
            if let Some(metrics) = period_block.metrics(block) {
                names
                    .entry(block)
                    .or_default()
                    .extend(metrics.keys().cloned());
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedRows {
    pub rows: Vec<NewFundamentalData>,
    /// Numeric values that could not be stored.
    pub skipped: usize,
}

/// Flattens a document into insertable rows. The caller checks that `ticker`
/// fits [`MAX_TICKER_LEN`].
pub fn extract_rows(
    ticker: &str,
    doc: &FundamentalsDocument,
    catalog: &MetricCatalog,
) -> ExtractedRows {
    let mut out = ExtractedRows::default();
    let Some(financials) = doc.financials.as_ref() else {
        return out;
    };
    for (period, period_block) in financials.periods() {
        for block in StatementType::FINANCIAL_BLOCKS {
            let Some(metrics) = period_block.metrics(block) else {
                continue;
            };

            for (metric_name, values) in metrics {
                let Some(values) = values.as_array() else {
                    continue;
                };
                let type_id = catalog.get(block, metric_name);

                for (idx, raw) in values.iter().enumerate() {
                    let value = match parse_value(raw) {
                        ParsedValue::Number(value) => value,
                        ParsedValue::Missing => continue,
                        ParsedValue::OutOfRange => {
                            warn!(
                                "{}: {}/{}/{} value {} is out of range",
                                ticker,
                                period.as_str(),
                                block.as_str(),
                                metric_name,
                                raw
                            );
                            out.skipped += 1;
                            continue;
                        }
                    };
                    let Some(label) = period_block.fiscal_years.get(idx) else {
                        warn!(
                            "{}: {}/{}/{} value #{} has no fiscal year label",
                            ticker,
                            period.as_str(),
                            block.as_str(),
                            metric_name,
                            idx
                        );
                        out.skipped += 1;
                        continue;
                    };
                    let Some((year, month)) = split_fiscal_year(label) else {
                        continue;
                    };
                    let Some(fundamental_data_type_id) = type_id else {
                        warn!(
                            "{}: metric {}/{} missing from catalog",
                            ticker,
                            block.as_str(),
                            metric_name
                        );
                        out.skipped += 1;
                        continue;
                    };
                    if year.chars().count() > MAX_YEAR_LEN
                        || month.chars().count() > MAX_MONTH_LEN
                    {
                        warn!(
                            "{}: fiscal year label {} does not fit year/month columns",
                            ticker, label
                        );
                        out.skipped += 1;
                        continue;
                    }

                    out.rows.push(NewFundamentalData {
                        ticker: ticker.to_string(),
                        period,
                        year,
                        month,
                        fundamental_data_type_id,
                        value,
                    });
                }
            }
        }
    }
    out
}
