//! Domain error types for the coalescing core.

use thiserror::Error;

/// Domain-specific errors for range coalescing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A symbolic spreadsheet name has no entry in the alias table.
    ///
    /// This is a caller input error: it fails the whole coalesce call before
    /// any upstream work starts.
    #[error("unknown spreadsheet alias: {alias}")]
    UnknownAlias { alias: String },

    /// A caller-supplied spreadsheet identifier was empty.
    #[error("spreadsheet identifier cannot be empty")]
    EmptySpreadsheetId,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
