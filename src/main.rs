mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use fundamentals::api::{self, AppState};
use fundamentals::config::{self, Settings};
use fundamentals::ingest::{DirectorySource, FundamentalsLoader, IngestOptions};
use fundamentals::storage;
use log::{info, warn};
use std::sync::Arc;

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before logging so RUST_LOG may come from .env.
    let dotenv = config::load_dotenv();
    init_logging(cli.log_level);
    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => info!("No .env file found, using process environment"),
        Err(e) => warn!("Failed to load .env: {}", e),
    }

    let settings = Settings::from_env().context("invalid configuration")?;
    let db = storage::establish_connection(&settings.database_url)
        .await
        .context("failed to connect to the database")?;
    let db = Arc::new(db);

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(settings.bind_addr);
            info!("fundamentals v{} starting", env!("CARGO_PKG_VERSION"));
            api::serve(Arc::new(AppState::new(db)), bind).await?;
        }
        Command::Ingest {
            data_dir,
            batch_size,
            concurrency,
        } => {
            let dir = data_dir.unwrap_or(settings.data_folder);
            info!("Ingesting documents from {}", dir.display());
            let loader = FundamentalsLoader::new(
                db,
                DirectorySource::new(dir),
                IngestOptions {
                    batch_size,
                    concurrency,
                },
            );
            let report = loader.run().await.context("ingest failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Migrate => {
            info!("Schema is up to date.");
        }
    }

    Ok(())
}

fn init_logging(crate_level: Option<log::LevelFilter>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .filter_module("fundamentals", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(level) = crate_level {
        builder.filter_module("fundamentals", level);
    }
    builder.init();
}
