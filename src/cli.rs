use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fundamentals service: HTTP API and bulk loader over PostgreSQL.
///
/// Database settings come from `DATABASE_URL` or `HOST`/`PORT`/`DATABASE`/
/// `USER`/`PASSWORD`, optionally via a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "fundamentals", version)]
pub struct Cli {
    /// Log level for this crate (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<log::LevelFilter>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Listen address. Defaults to BIND_ADDR or 0.0.0.0:8000.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Load `<TICKER>.json` fundamentals documents into the database.
    Ingest {
        /// Input directory. Defaults to DATA_FOLDER or fundamentals_data/nse.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Rows collected before a batch is written.
        #[arg(long, default_value_t = fundamentals::ingest::service::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Documents read concurrently.
        #[arg(long, default_value_t = fundamentals::ingest::service::DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Create enum types, tables and indexes, then exit.
    Migrate,
}
