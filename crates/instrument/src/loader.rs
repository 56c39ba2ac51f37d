//! Loading the instrument master list into a reference table.
//!
//! Row handling is best-effort: a malformed row is counted and skipped, never
//! fatal. A failed fetch or an undecodable document fails the whole load,
//! which [`ReferenceLoader::load_into`] turns into an empty table.

use crate::error::{InstrumentError, InstrumentResult};
use crate::resolver::InstrumentResolver;
use crate::source::{
    FileReferenceSource, HttpReferenceSource, ReferenceDocument, ReferenceFormat, ReferenceSource,
};
use crate::table::{ReferenceTable, ReferenceTableBuilder};
use config::LiveConfig;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Column holding the instrument key in the master CSV.
const KEY_COLUMN: usize = 0;
/// Column holding the trading symbol in the master CSV.
const SYMBOL_COLUMN: usize = 2;

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Rows that produced a mapping.
    pub rows: usize,
    /// Rows skipped as malformed.
    pub skipped: usize,
    /// Index aliases injected after the primary rows.
    pub aliases: usize,
}

/// Fetches the master list from a [`ReferenceSource`] and builds the table.
pub struct ReferenceLoader {
    source: Arc<dyn ReferenceSource>,
}

impl ReferenceLoader {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self { source }
    }

    /// Build a loader from the live provider settings.
    ///
    /// A non-empty `reference_path` wins over `reference_url`.
    pub fn from_config(config: &LiveConfig) -> InstrumentResult<Self> {
        let source: Arc<dyn ReferenceSource> = match config.reference_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Arc::new(FileReferenceSource::new(path)),
            _ => Arc::new(HttpReferenceSource::new(
                config.reference_url.clone(),
                Duration::from_secs(config.timeout_seconds),
                &config.user_agent,
            )?),
        };

        Ok(Self::new(source))
    }

    /// Where the loader reads from.
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Fetch and decode the document into a fresh table, aliases included.
    pub async fn load(&self) -> InstrumentResult<(ReferenceTable, LoadReport)> {
        let document = self.source.fetch().await?;
        debug!(
            source = %self.source.describe(),
            format = ?document.format,
            bytes = document.bytes.len(),
            "Reference document fetched"
        );
        parse_document(&document)
    }

    /// Load and publish into `resolver`, returning the number of symbols now known.
    ///
    /// On failure the error is logged once, the resolver gets an empty table,
    /// and `0` is returned. The process keeps running without reference data.
    pub async fn load_into(&self, resolver: &InstrumentResolver) -> usize {
        match self.load().await {
            Ok((table, report)) => {
                if report.skipped > 0 {
                    warn!(skipped = report.skipped, "Skipped malformed reference rows");
                }
                info!(
                    source = %self.source.describe(),
                    rows = report.rows,
                    aliases = report.aliases,
                    "Reference table loaded"
                );
                resolver.replace(table)
            }
            Err(e) => {
                error!(
                    source = %self.source.describe(),
                    error = %e,
                    "Failed to load reference table, continuing with an empty table"
                );
                resolver.replace(ReferenceTable::empty());
                0
            }
        }
    }
}

/// Decode a reference document into a table and inject the index aliases.
pub fn parse_document(document: &ReferenceDocument) -> InstrumentResult<(ReferenceTable, LoadReport)> {
    let mut builder = ReferenceTable::builder();

    let (rows, skipped) = match document.format {
        ReferenceFormat::Csv => parse_csv(&document.bytes, &mut builder)?,
        ReferenceFormat::GzipCsv => {
            let csv = decompress(&document.bytes)?;
            parse_csv(&csv, &mut builder)?
        }
        ReferenceFormat::Json => parse_json(&document.bytes, &mut builder)?,
    };

    let aliases = builder.insert_index_aliases();

    Ok((
        builder.build(),
        LoadReport {
            rows,
            skipped,
            aliases,
        },
    ))
}

fn decompress(bytes: &[u8]) -> InstrumentResult<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| InstrumentError::Decode(format!("gzip: {}", e)))?;
    Ok(out)
}

/// Returns `(rows, skipped)`.
fn parse_csv(bytes: &[u8], builder: &mut ReferenceTableBuilder) -> InstrumentResult<(usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| InstrumentError::Decode(format!("csv header: {}", e)))?;
    if headers.is_empty() {
        return Err(InstrumentError::Decode("csv header: document is empty".to_string()));
    }

    let mut rows = 0;
    let mut skipped = 0;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable reference row");
                skipped += 1;
                continue;
            }
        };

        let key = record.get(KEY_COLUMN).map(str::trim).unwrap_or_default();
        let symbol = record.get(SYMBOL_COLUMN).map(str::trim).unwrap_or_default();

        if key.is_empty() || symbol.is_empty() {
            skipped += 1;
            continue;
        }

        builder.insert(symbol, key);
        rows += 1;
    }

    Ok((rows, skipped))
}

/// Returns `(rows, skipped)`. Non-string values are skipped.
fn parse_json(bytes: &[u8], builder: &mut ReferenceTableBuilder) -> InstrumentResult<(usize, usize)> {
    let map: HashMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;

    let mut rows = 0;
    let mut skipped = 0;

    for (symbol, value) in map {
        match value.as_str() {
            Some(key) if !key.is_empty() && !symbol.is_empty() => {
                builder.insert(symbol, key);
                rows += 1;
            }
            _ => skipped += 1,
        }
    }

    Ok((rows, skipped))
}
