//! Where the instrument master list comes from.
//!
//! A [`ReferenceSource`] only fetches raw bytes and says what format they are
//! in; decoding lives in [`crate::loader`].

use crate::error::{InstrumentError, InstrumentResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Encoding of a reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFormat {
    /// Plain CSV with a header row.
    Csv,
    /// Gzip-compressed CSV with a header row.
    GzipCsv,
    /// Flat JSON object `{ "SYMBOL": "KEY", ... }`.
    Json,
}

impl ReferenceFormat {
    /// Pick a format from a file name or URL path by extension.
    ///
    /// Anything that is not `.json` or `.gz` is treated as plain CSV.
    pub fn from_path(path: &str) -> Self {
        // Ignore any query string or fragment on URLs
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let lower = path.to_ascii_lowercase();

        if lower.ends_with(".json") {
            ReferenceFormat::Json
        } else if lower.ends_with(".gz") {
            ReferenceFormat::GzipCsv
        } else {
            ReferenceFormat::Csv
        }
    }
}

/// Raw reference document as fetched.
#[derive(Debug, Clone)]
pub struct ReferenceDocument {
    pub format: ReferenceFormat,
    pub bytes: Vec<u8>,
}

impl ReferenceDocument {
    pub fn new(format: ReferenceFormat, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            format,
            bytes: bytes.into(),
        }
    }
}

/// Fetches the instrument master list.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch the whole document.
    async fn fetch(&self) -> InstrumentResult<ReferenceDocument>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

// ==================== HTTP Implementation ====================

/// Downloads the master list over HTTP(S).
pub struct HttpReferenceSource {
    client: Client,
    url: String,
}

impl HttpReferenceSource {
    /// Create a source with a bounded request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> InstrumentResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| InstrumentError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ReferenceSource for HttpReferenceSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> InstrumentResult<ReferenceDocument> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(InstrumentError::Fetch(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Reference document downloaded");

        Ok(ReferenceDocument::new(
            ReferenceFormat::from_path(&self.url),
            bytes.to_vec(),
        ))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ==================== File Implementation ====================

/// Reads the master list from a local file.
pub struct FileReferenceSource {
    path: PathBuf,
}

impl FileReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReferenceSource for FileReferenceSource {
    async fn fetch(&self) -> InstrumentResult<ReferenceDocument> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| InstrumentError::Fetch(format!("{}: {}", self.path.display(), e)))?;

        Ok(ReferenceDocument::new(
            ReferenceFormat::from_path(&self.path.to_string_lossy()),
            bytes,
        ))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ==================== In-Memory Implementation ====================

/// Serves a fixed document, or a fixed failure. Used by tests and demos.
pub struct InMemoryReferenceSource {
    result: Mutex<InstrumentResult<ReferenceDocument>>,
}

impl InMemoryReferenceSource {
    pub fn new(document: ReferenceDocument) -> Self {
        Self {
            result: Mutex::new(Ok(document)),
        }
    }

    /// A source whose every fetch fails with `error`.
    pub fn failing(error: InstrumentError) -> Self {
        Self {
            result: Mutex::new(Err(error)),
        }
    }

}

#[async_trait]
impl ReferenceSource for InMemoryReferenceSource {
    async fn fetch(&self) -> InstrumentResult<ReferenceDocument> {
        self.result.lock().clone()
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReferenceFormat::from_path("instruments.json"), ReferenceFormat::Json);
        assert_eq!(ReferenceFormat::from_path("NSE.csv.gz"), ReferenceFormat::GzipCsv);
        assert_eq!(ReferenceFormat::from_path("NSE.CSV"), ReferenceFormat::Csv);
        assert_eq!(
            ReferenceFormat::from_path("https://assets.example.com/NSE.csv.gz?v=2"),
            ReferenceFormat::GzipCsv
        );
    }

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let path = std::env::temp_dir().join(format!("tickforge-ref-{}.json", std::process::id()));
        tokio::fs::write(&path, br#"{"TCS":"NSE_EQ|INE467B01029"}"#)
            .await
            .unwrap();

        let source = FileReferenceSource::new(&path);
        let doc = source.fetch().await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(doc.format, ReferenceFormat::Json);
        assert!(doc.bytes.starts_with(b"{\"TCS\""));
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let source = FileReferenceSource::new("/nonexistent/instruments.csv");
        assert_matches!(source.fetch().await, Err(InstrumentError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemoryReferenceSource::failing(InstrumentError::Fetch("down".into()));
        assert_matches!(source.fetch().await, Err(InstrumentError::Fetch(_)));

        let source = InMemoryReferenceSource::new(ReferenceDocument::new(ReferenceFormat::Csv, "a,b,c\n"));
        assert_eq!(source.fetch().await.unwrap().format, ReferenceFormat::Csv);
    }
}
