//! The reference table: an immutable `symbol -> instrument key` snapshot.
//!
//! Tables are assembled with [`ReferenceTableBuilder`] and never mutated after
//! `build()`. Replacing the data means building a new table and swapping it
//! into the [`InstrumentResolver`](crate::InstrumentResolver).

use crate::types::InstrumentKey;
use std::collections::HashMap;

/// Index spellings injected after every successful primary load.
///
/// The exchange master list does not carry the indices under the names users
/// type, so each canonical index key gets a few aliases.
pub const INDEX_ALIASES: &[(&str, &str)] = &[
    ("NIFTY 50", "NSE_INDEX|Nifty 50"),
    ("NIFTY50", "NSE_INDEX|Nifty 50"),
    ("NIFTY BANK", "NSE_INDEX|Nifty Bank"),
    ("BANKNIFTY", "NSE_INDEX|Nifty Bank"),
];

/// Exchange suffixes stripped by the resolver on a lookup miss.
pub const EXCHANGE_SUFFIXES: &[&str] = &[".NS"];

/// Immutable mapping from symbol to instrument key.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, InstrumentKey>,
}

impl ReferenceTable {
    /// An empty table. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a new table.
    pub fn builder() -> ReferenceTableBuilder {
        ReferenceTableBuilder::new()
    }

    /// Exact lookup. No case folding or trimming.
    pub fn get(&self, symbol: &str) -> Option<&InstrumentKey> {
        self.entries.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Number of distinct symbols (aliases included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, InstrumentKey)> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = (String, InstrumentKey)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Builder for [`ReferenceTable`].
///
/// Later inserts for the same symbol overwrite earlier ones, matching the
/// row order of the master file.
#[derive(Debug, Default)]
pub struct ReferenceTableBuilder {
    entries: HashMap<String, InstrumentKey>,
}

impl ReferenceTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a single mapping.
    pub fn insert(&mut self, symbol: impl Into<String>, key: impl Into<InstrumentKey>) -> &mut Self {
        self.entries.insert(symbol.into(), key.into());
        self
    }

    /// Inject the fixed [`INDEX_ALIASES`]. Returns how many aliases were added.
    pub fn insert_index_aliases(&mut self) -> usize {
        for (symbol, key) in INDEX_ALIASES {
            self.entries
                .insert((*symbol).to_string(), InstrumentKey::new(*key));
        }
        INDEX_ALIASES.len()
    }

    /// Number of mappings collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into an immutable table.
    pub fn build(self) -> ReferenceTable {
        ReferenceTable {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overwrites_duplicates() {
        let mut builder = ReferenceTable::builder();
        builder
            .insert("RELIANCE", "NSE_EQ|OLD")
            .insert("RELIANCE", "NSE_EQ|INE002A01018");
        let table = builder.build();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("RELIANCE").unwrap().as_str(), "NSE_EQ|INE002A01018");
    }

    #[test]
    fn test_index_aliases() {
        let mut builder = ReferenceTableBuilder::new();
        let added = builder.insert_index_aliases();
        let table = builder.build();

        assert_eq!(added, 4);
        assert_eq!(table.get("NIFTY 50"), table.get("NIFTY50"));
        assert_eq!(table.get("NIFTY BANK"), table.get("BANKNIFTY"));
        assert_eq!(table.get("BANKNIFTY").unwrap().as_str(), "NSE_INDEX|Nifty Bank");
    }

    #[test]
    fn test_lookup_is_exact() {
        let table: ReferenceTable =
            vec![("TCS".to_string(), InstrumentKey::new("NSE_EQ|INE467B01029"))]
                .into_iter()
                .collect();

        assert!(table.contains("TCS"));
        assert!(!table.contains("tcs"));
        assert!(!table.contains(" TCS"));
        assert!(ReferenceTable::empty().is_empty());
    }
}
