//! rsheets-domain: Coalescing core and value types
//!
//! This crate contains the request-coalescing logic and the value types it
//! operates on. It performs no I/O; the upstream client lives in
//! `rsheets-upstream` and the HTTP surface in `rsheets-api`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              rsheets-domain                  │
//! ├─────────────────────────────────────────────┤
//! │  types.rs    - Range/key/payload types      │
//! │  grouping.rs - Composite-key grouping store │
//! │  coalesce.rs - Range-request coalescing     │
//! │  alias.rs    - Spreadsheet alias table      │
//! │  filter.rs   - Sheet title filtering        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod alias;
pub mod coalesce;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod types;

// Re-exports for convenience
pub use alias::AliasTable;
pub use coalesce::coalesce;
pub use error::{DomainError, DomainResult};
pub use filter::TitleFilter;
pub use grouping::GroupingStore;
pub use types::{
    BatchPayload, BatchResult, CompositeKey, Dimension, RangeRequest, SpreadsheetRef, ValueRange,
};
