//! Coalesced multi-range read handling.
//!
//! Incoming range requests are grouped by `(spreadsheet id, dimension)`,
//! deduplicated within each group, fetched with one upstream call per group,
//! and reassembled into per-group results.

mod handler;
mod types;


pub use handler::BatchGetHandler;
pub use types::{BatchGetError, BatchGetResult, MAX_BATCH_RANGES};
