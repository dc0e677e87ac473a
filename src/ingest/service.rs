use super::document::{
    collect_metric_names, extract_rows, FundamentalsDocument, MetricCatalog, MetricNames,
    MAX_METRIC_NAME_LEN, MAX_TICKER_LEN,
};
use super::source::DocumentSource;
use super::IngestError;
use crate::storage::repository::{
    FundamentalDataRepository, FundamentalDataTypeRepository, NewFundamentalData,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt};
use log::{info, warn};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_BATCH_SIZE: usize = 50_000;
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// A batch is written once it holds more than this many rows.
    pub batch_size: usize,
    /// Documents loaded from the source at the same time.
    pub concurrency: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub documents: usize,
    pub documents_skipped: usize,
    pub metric_types_created: usize,
    pub rows_parsed: usize,
    pub rows_skipped: usize,
    pub rows_inserted: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Tickers worth importing plus every metric name they mention.
#[derive(Debug, Default)]
struct ScanOutcome {
    names: MetricNames,
    tickers: Vec<String>,
    skipped: usize,
}

pub struct FundamentalsLoader<S> {
    db: Arc<DatabaseConnection>,
    source: S,
    options: IngestOptions,
}

impl<S: DocumentSource> FundamentalsLoader<S> {
    pub fn new(db: Arc<DatabaseConnection>, source: S, options: IngestOptions) -> Self {
        Self {
            db,
            source,
            options,
        }
    }

    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let started_at = Utc::now();
        let tickers = self.source.tickers().await?;

        info!("Scanning metrics in {} documents...", tickers.len());
        let scan = self.scan_metric_names(&tickers).await;

        info!("Creating metric type rows...");
        let (catalog, metric_types_created) = self.ensure_metric_types(&scan.names).await?;

        info!("Importing data for {} tickers...", scan.tickers.len());
        let (rows_parsed, rows_skipped, rows_inserted) =
            self.import(&scan.tickers, &catalog).await?;

        let report = IngestReport {
            documents: tickers.len(),
            documents_skipped: scan.skipped,
            metric_types_created,
            rows_parsed,
            rows_skipped,
            rows_inserted,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "Import completed: documents={} skipped={} types_created={} rows_parsed={} rows_inserted={}",
            report.documents,
            report.documents_skipped,
            report.metric_types_created,
            report.rows_parsed,
            report.rows_inserted
        );
        Ok(report)
    }

    fn documents<'a>(
        &'a self,
        tickers: &'a [String],
    ) -> impl Stream<Item = (&'a str, Result<FundamentalsDocument, IngestError>)> + 'a {
        let source = &self.source;
        stream::iter(tickers)
            .map(move |ticker| async move { (ticker.as_str(), source.load(ticker).await) })
            .buffered(self.options.concurrency.max(1))
    }

    async fn scan_metric_names(&self, tickers: &[String]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let docs = self.documents(tickers);
        futures::pin_mut!(docs);

        while let Some((ticker, doc)) = docs.next().await {
            match doc {
                Ok(_) if ticker.chars().count() > MAX_TICKER_LEN => {
                    warn!(
                        "{}: ticker is longer than {} characters, skipped",
                        ticker, MAX_TICKER_LEN
                    );
                    outcome.skipped += 1;
                }
                Ok(doc) if doc.financials.is_some() => {
                    collect_metric_names(&doc, &mut outcome.names);
                    outcome.tickers.push(ticker.to_string());
                }
                Ok(_) => {
                    warn!("{}: no financials section, skipped", ticker);
                    outcome.skipped += 1;
                }
                Err(e) => {
                    warn!("{}: {}", ticker, e);
                    outcome.skipped += 1;
                }
            }
        }
        outcome
    }

    /// Returns the full catalog and how many type rows were created.
    async fn ensure_metric_types(
        &self,
        names: &MetricNames,
    ) -> Result<(MetricCatalog, usize), IngestError> {
        let existing = FundamentalDataTypeRepository::load_catalog(self.db.as_ref()).await?;
        let mut catalog = MetricCatalog::new(existing);
        let mut created = 0usize;

        let txn = self.db.begin().await?;
        for (block, metric_names) in names {
            for name in metric_names {
                if catalog.contains(*block, name) {
                    continue;
                }
                if name.chars().count() > MAX_METRIC_NAME_LEN {
                    warn!(
                        "metric name {:?} is longer than {} characters, skipped",
                        name, MAX_METRIC_NAME_LEN
                    );
                    continue;
                }
                let model = FundamentalDataTypeRepository::insert(&txn, *block, name).await?;
                catalog.insert(model.statement_type, model.name, model.id);
                created += 1;
            }
        }
        txn.commit().await?;

        Ok((catalog, created))
    }

    async fn import(
        &self,
        tickers: &[String],
        catalog: &MetricCatalog,
    ) -> Result<(usize, usize, u64), IngestError> {
        let mut batch: Vec<NewFundamentalData> = Vec::new();
        let mut parsed = 0usize;
        let mut skipped = 0usize;
        let mut inserted = 0u64;

        let docs = self.documents(tickers);
        futures::pin_mut!(docs);

        while let Some((ticker, doc)) = docs.next().await {
            let doc = match doc {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("{}: {}", ticker, e);
                    continue;
                }
            };
            let extracted = extract_rows(ticker, &doc, catalog);
            parsed += extracted.rows.len();
            skipped += extracted.skipped;
            batch.extend(extracted.rows);

            if batch.len() > self.options.batch_size {
                inserted += self.flush(&mut batch).await?;
            }
        }
        inserted += self.flush(&mut batch).await?;

        Ok((parsed, skipped, inserted))
    }

    async fn flush(&self, batch: &mut Vec<NewFundamentalData>) -> Result<u64, IngestError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let rows = std::mem::take(batch);
        let total = rows.len();
        let inserted =
            FundamentalDataRepository::insert_batch_ignore_conflicts(self.db.as_ref(), rows)
                .await?;
        info!(
            "Inserted {} of {} rows ({} already present)",
            inserted,
            total,
            (total as u64).saturating_sub(inserted)
        );
        Ok(inserted)
    }
}
