use super::document::FundamentalsDocument;
use super::IngestError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Where fundamentals documents come from. One document per ticker.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Tickers available in this source, in a stable order.
    async fn tickers(&self) -> Result<Vec<String>, IngestError>;

    async fn load(&self, ticker: &str) -> Result<FundamentalsDocument, IngestError>;
}

/// A folder of `<TICKER>.json` files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker))
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn tickers(&self) -> Result<Vec<String>, IngestError> {
        let io_err = |source| IngestError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        let mut tickers = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if !entry.file_type().await.map_err(io_err)?.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tickers.push(stem.to_string());
            }
        }
        tickers.sort();
        Ok(tickers)
    }

    async fn load(&self, ticker: &str) -> Result<FundamentalsDocument, IngestError> {
        let path = self.path_for(ticker);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| IngestError::Io { path, source })?;
        serde_json::from_slice(&bytes).map_err(|source| IngestError::Json {
            ticker: ticker.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_json_files_sorted_by_ticker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TCS.json"), "{}").unwrap();
        std::fs::write(dir.path().join("INFY.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.tickers().await.unwrap(), vec!["INFY", "TCS"]);
    }

    #[tokio::test]
    async fn malformed_document_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BAD.json"), "{not json").unwrap();

        let source = DirectorySource::new(dir.path());
        let err = source.load("BAD").await.unwrap_err();
        assert!(matches!(err, IngestError::Json { ref ticker, .. } if ticker == "BAD"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let source = DirectorySource::new("/definitely/not/here");
        assert!(matches!(
            source.tickers().await,
            Err(IngestError::Io { .. })
        ));
    }
}
