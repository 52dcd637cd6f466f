//! rsheets-upstream: Upstream spreadsheet service clients
//!
//! This crate defines the [`SheetsClient`] trait the rest of the service
//! programs against, plus two implementations:
//!
//! - [`RestSheetsClient`]: Google Sheets v4 value endpoints over HTTP
//! - [`MemorySheetsClient`]: in-memory spreadsheets for development and tests
//!
//! Implementations are constructed explicitly at startup and shared via
//! `Arc`; there is no lazily-initialized process-global client.

pub mod error;
pub mod memory;
pub mod rest;
pub mod traits;

// Re-exports for convenience
pub use error::{UpstreamError, UpstreamErrorDetail, UpstreamResult};
pub use memory::MemorySheetsClient;
pub use rest::{RestClientConfig, RestSheetsClient};
pub use traits::{BatchGetResponse, GetRangeParams, SheetsClient, WriteRangeParams};
