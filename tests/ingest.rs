mod common;

use async_trait::async_trait;
use common::{seed_type, test_db};
use fundamentals::ingest::{
    DirectorySource, DocumentSource, FundamentalsDocument, FundamentalsLoader, IngestError,
    IngestOptions,
};
use fundamentals::storage::entity::fundamental_data::{self, Entity as FundamentalData};
use fundamentals::storage::entity::{PeriodType, StatementType};
use fundamentals::storage::repository::{FundamentalDataTypeRepository, INSERT_CHUNK_ROWS};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

fn sample_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "TCS.json",
        &json!({
            "financials": {
                "annuals": {
                    "Fiscal Year": ["2022-03", "2023-03", "TTM"],
                    "income_statement": {
                        "Revenue": ["100", "120", "130"],
                        "Net Income": ["10", "N/A", "-"]
                    },
                    "balance_sheet": {"Total Assets": [500, 550, null]}
                },
                "quarterly": {
                    "Fiscal Year": ["2023-06", "2023-09"],
                    "income_statement": {"Revenue": ["30", "32.5"]}
                }
            }
        })
        .to_string(),
    );
    write(
        dir.path(),
        "INFY.json",
        &json!({
            "financials": {
                "annuals": {
                    "Fiscal Year": ["2023-03"],
                    "income_statement": {"Revenue": ["80", "90"]},
                    "valuation_ratios": {"PE Ratio": ["25.5"]}
                }
            }
        })
        .to_string(),
    );
    write(dir.path(), "EMPTY.json", r#"{"profile": {"name": "Shell Co"}}"#);
    write(dir.path(), "BROKEN.json", "{\"financials\": ");
    write(dir.path(), "README.txt", "not a document");
    dir
}

fn small_batches() -> IngestOptions {
    IngestOptions {
        batch_size: 2,
        concurrency: 2,
    }
}

#[tokio::test]
async fn loads_a_directory_of_documents() {
    let db = test_db().await;
    let dir = sample_dir();

    let loader = FundamentalsLoader::new(db.clone(), DirectorySource::new(dir.path()), small_batches());
    let report = loader.run().await.unwrap();

    assert_eq!(report.documents, 4);
    assert_eq!(report.documents_skipped, 2);
    assert_eq!(report.metric_types_created, 4);
    assert_eq!(report.rows_parsed, 9);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.rows_inserted, 9);
    assert!(report.finished_at >= report.started_at);

    let types = FundamentalDataTypeRepository::load_catalog(db.as_ref()).await.unwrap();
    assert_eq!(types.len(), 4);
    let revenue = types[&(StatementType::IncomeStatement, "Revenue".to_string())];
    assert!(types.contains_key(&(StatementType::ValuationRatios, "PE Ratio".to_string())));

    let q3 = FundamentalData::find()
        .filter(fundamental_data::Column::Ticker.eq("TCS"))
        .filter(fundamental_data::Column::Period.eq(PeriodType::Quarterly))
        .filter(fundamental_data::Column::Month.eq("09"))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(q3.year, "2023");
    assert_eq!(q3.fundamental_data_type_id, revenue);
    assert_eq!(q3.value, Decimal::new(325, 1));

    let ttm_rows = FundamentalData::find()
        .filter(fundamental_data::Column::Year.eq("TTM"))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(ttm_rows, 0);
}

#[tokio::test]
async fn rerunning_is_a_no_op() {
    let db = test_db().await;
    let dir = sample_dir();
    let loader = FundamentalsLoader::new(db.clone(), DirectorySource::new(dir.path()), small_batches());

    loader.run().await.unwrap();
    let again = loader.run().await.unwrap();

    assert_eq!(again.metric_types_created, 0);
    assert_eq!(again.rows_parsed, 9);
    assert_eq!(again.rows_inserted, 0);
    assert_eq!(FundamentalData::find().count(db.as_ref()).await.unwrap(), 9);
}

#[tokio::test]
async fn reuses_existing_metric_types() {
    let db = test_db().await;
    let existing = seed_type(&db, StatementType::IncomeStatement, "Revenue").await;
    let dir = sample_dir();

    let report = FundamentalsLoader::new(db.clone(), DirectorySource::new(dir.path()), small_batches())
        .run()
        .await
        .unwrap();
    assert_eq!(report.metric_types_created, 3);

    let revenue_rows = FundamentalData::find()
        .filter(fundamental_data::Column::FundamentalDataTypeId.eq(existing))
        .count(db.as_ref())
        .await
        .unwrap();
    // TCS: two annual + two quarterly, INFY: one annual.
    assert_eq!(revenue_rows, 5);
}

#[tokio::test]
async fn missing_directory_fails_the_run() {
    let db = test_db().await;
    let loader = FundamentalsLoader::new(
        db,
        DirectorySource::new("/no/such/fundamentals"),
        IngestOptions::default(),
    );
    assert!(matches!(loader.run().await, Err(IngestError::Io { .. })));
}

/// Documents held in memory, keyed by ticker.
struct StaticSource(BTreeMap<String, Value>);

#[async_trait]
impl DocumentSource for StaticSource {
    async fn tickers(&self) -> Result<Vec<String>, IngestError> {
        Ok(self.0.keys().cloned().collect())
    }

    async fn load(&self, ticker: &str) -> Result<FundamentalsDocument, IngestError> {
        let doc = self.0.get(ticker).cloned().unwrap_or(Value::Null);
        serde_json::from_value(doc).map_err(|source| IngestError::Json {
            ticker: ticker.to_string(),
            source,
        })
    }
}

#[tokio::test]
async fn large_documents_are_written_in_several_statements() {
    let db = test_db().await;

    let total = INSERT_CHUNK_ROWS + INSERT_CHUNK_ROWS / 2;
    let labels: Vec<String> = (0..total)
        .map(|i| format!("{}-{:02}", 1000 + i / 12, i % 12 + 1))
        .collect();
    let values: Vec<String> = (0..total).map(|i| i.to_string()).collect();

    let mut docs = BTreeMap::new();
    docs.insert(
        "BIG".to_string(),
        json!({
            "financials": {
                "quarterly": {
                    "Fiscal Year": labels,
                    "per_share_data_array": {"EPS": values}
                }
            }
        }),
    );
    docs.insert("NULL".to_string(), Value::Null);

    let report = FundamentalsLoader::new(db.clone(), StaticSource(docs), IngestOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.documents, 2);
    assert_eq!(report.documents_skipped, 1);
    assert_eq!(report.metric_types_created, 1);
    assert_eq!(report.rows_inserted, total as u64);
    assert_eq!(
        FundamentalData::find().count(db.as_ref()).await.unwrap(),
        total as u64
    );
}

#[tokio::test]
async fn oversized_tickers_and_values_are_counted_as_skipped() {
    let db = test_db().await;
    let financials = |revenue: Value| {
        json!({
            "financials": {
                "annuals": {
                    "Fiscal Year": ["2022-03", "2023-03"],
                    "income_statement": {"Revenue": revenue}
                }
            }
        })
    };

    let mut docs = BTreeMap::new();
    docs.insert("L".repeat(31), financials(json!(["1", "2"])));
    docs.insert("WIPRO".to_string(), financials(json!(["1e30", "7"])));

    let report = FundamentalsLoader::new(db.clone(), StaticSource(docs), IngestOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.documents, 2);
    assert_eq!(report.documents_skipped, 1);
    assert_eq!(report.rows_parsed, 1);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.rows_inserted, 1);

    let stored = FundamentalData::find().all(db.as_ref()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].ticker, "WIPRO");
    assert_eq!(stored[0].value, Decimal::from(7));
}
