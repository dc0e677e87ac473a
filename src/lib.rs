//! Fundamental financial data: PostgreSQL schema, a read-only HTTP API and a
//! bulk loader for per-ticker JSON documents.

pub mod api;
pub mod config;
pub mod ingest;
pub mod storage;
