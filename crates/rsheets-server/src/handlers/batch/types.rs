//! Data types for coalesced multi-range reads.

use rsheets_domain::DomainError;
use rsheets_upstream::UpstreamError;

/// Maximum number of ranges accepted in a single request, counted before
/// deduplication.
pub const MAX_BATCH_RANGES: usize = 100;

/// Errors that can occur during a coalesced multi-range read.
#[derive(Debug, thiserror::Error)]
pub enum BatchGetError {
    /// The request carries no ranges at all.
    #[error("ranges cannot be empty")]
    EmptyBatch,

    /// The request exceeds the maximum allowed number of ranges.
    #[error("batch size {size} exceeds maximum allowed {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// A range entry is malformed.
    #[error("invalid range at index {index}: {message}")]
    InvalidRange { index: usize, message: String },

    /// A spreadsheet reference failed to resolve. Fatal for the whole
    /// request, never a per-item skip.
    #[error(transparent)]
    Resolution(#[from] DomainError),

    /// An upstream call failed; the first failure aborts the whole request.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Result type for coalesced multi-range reads.
pub type BatchGetResult<T> = Result<T, BatchGetError>;
