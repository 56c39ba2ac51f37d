//! Symbol resolution against the current reference table snapshot.

use crate::error::{InstrumentError, InstrumentResult};
use crate::table::{ReferenceTable, EXCHANGE_SUFFIXES};
use crate::types::InstrumentKey;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves human-facing symbols to instrument keys.
///
/// Holds the process-wide reference table as an `Arc` snapshot. Lookups clone
/// the `Arc` under a short read lock and search without holding it; reloads
/// swap the whole snapshot under the write lock.
#[derive(Debug, Default)]
pub struct InstrumentResolver {
    table: RwLock<Arc<ReferenceTable>>,
}

impl InstrumentResolver {
    /// Create a resolver over an already-built table.
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// A resolver with no entries. Every symbol is `NotFound` until a table is loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ReferenceTable> {
        Arc::clone(&self.table.read())
    }

    /// Atomically publish a new table. Returns the number of symbols it holds.
    pub fn replace(&self, table: ReferenceTable) -> usize {
        let len = table.len();
        *self.table.write() = Arc::new(table);
        info!(symbols = len, "Reference table replaced");
        len
    }

    /// Number of symbols in the current snapshot.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Resolve a symbol.
    ///
    /// Exact lookup first; on a miss a known exchange suffix is stripped and the
    /// lookup retried once. No case folding or fuzzy matching.
    pub fn resolve(&self, symbol: &str) -> InstrumentResult<InstrumentKey> {
        let table = self.snapshot();

        if let Some(key) = table.get(symbol) {
            return Ok(key.clone());
        }

        if let Some(base) = strip_exchange_suffix(symbol) {
            if let Some(key) = table.get(base) {
                debug!(symbol, base, "Resolved after stripping exchange suffix");
                return Ok(key.clone());
            }
        }

        Err(InstrumentError::not_found(symbol))
    }
}

/// Strip one known exchange suffix (`RELIANCE.NS` -> `RELIANCE`).
///
/// Returns `None` when the symbol carries no known suffix or would be empty
/// after stripping.
pub fn strip_exchange_suffix(symbol: &str) -> Option<&str> {
    EXCHANGE_SUFFIXES
        .iter()
        .find_map(|suffix| symbol.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
}
