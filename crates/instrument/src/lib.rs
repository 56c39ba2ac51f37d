//! # Instrument Crate
//!
//! Reference data layer for Tickforge. Every market data request starts here:
//! a human-facing symbol (`RELIANCE`, `RELIANCE.NS`, `NIFTY 50`) is resolved to
//! the canonical instrument key the upstream candle source understands.
//!
//! ## Key Components
//!
//! - **Domain Types**: `InstrumentKey`
//! - **Reference Table**: immutable `symbol -> key` snapshot with the well-known index aliases
//! - **Resolver**: `InstrumentResolver`, exact lookup with one exchange-suffix fallback
//! - **Loader**: `ReferenceLoader`, fetches and decodes the instrument master list
//! - **Sources**: `ReferenceSource` trait with HTTP, file and in-memory implementations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Instrument Crate                         │
//! │  ┌──────────────────┐        ┌───────────────────────────┐  │
//! │  │  ReferenceLoader │──────▶ │  ReferenceSource (trait)  │  │
//! │  │  csv / gzip/json │        │  Http │ File │ InMemory   │  │
//! │  └────────┬─────────┘        └───────────────────────────┘  │
//! │           │ builds                                          │
//! │           ▼                                                 │
//! │  ┌──────────────────┐        ┌───────────────────────────┐  │
//! │  │  ReferenceTable  │◀────── │  InstrumentResolver       │  │
//! │  │  (Arc snapshot)  │  swap  │  resolve(symbol) -> key   │  │
//! │  └──────────────────┘        └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is built completely before it is published; the resolver only
//! ever swaps whole snapshots, so a reader never sees a half-loaded table.

pub mod error;
pub mod loader;
pub mod resolver;
pub mod source;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use error::{InstrumentError, InstrumentResult};
pub use loader::{parse_document, LoadReport, ReferenceLoader};
pub use resolver::{strip_exchange_suffix, InstrumentResolver};
pub use source::{
    FileReferenceSource, HttpReferenceSource, InMemoryReferenceSource, ReferenceDocument,
    ReferenceFormat, ReferenceSource,
};
pub use table::{ReferenceTable, ReferenceTableBuilder, EXCHANGE_SUFFIXES, INDEX_ALIASES};
pub use types::InstrumentKey;
