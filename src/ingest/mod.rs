//! Bulk loader for per-ticker fundamentals documents.
//!
//! The load runs in three passes over the source: collect every metric name,
//! make sure each `(statement type, metric name)` has a `fundamental_data_type`
//! row, then flatten each document into `fundamental_data` rows and insert them
//! in batches. Rows already present are left untouched, so a rerun is a no-op.

pub mod document;
pub mod service;
pub mod source;

pub use document::{FundamentalsDocument, MetricCatalog, MetricNames, ParsedValue};
pub use service::{FundamentalsLoader, IngestOptions, IngestReport};
pub use source::{DirectorySource, DocumentSource};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document for {ticker}: {source}")]
    Json {
        ticker: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
