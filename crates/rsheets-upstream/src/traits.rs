//! SheetsClient trait definition.

use async_trait::async_trait;

use rsheets_domain::{BatchPayload, Dimension, ValueRange};

use crate::error::UpstreamResult;

/// Parameters for a single-range read.
#[derive(Debug, Clone)]
pub struct GetRangeParams {
    pub spreadsheet_id: String,
    pub range: String,
    pub dimension: Dimension,
}

/// Parameters for a range update or append.
#[derive(Debug, Clone)]
pub struct WriteRangeParams {
    pub spreadsheet_id: String,
    pub range: String,
    pub dimension: Dimension,
    pub values: Vec<Vec<String>>,
}

/// Response of a batch-get call: one value range per requested range, in
/// request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGetResponse {
    pub spreadsheet_id: String,
    pub value_ranges: Vec<ValueRange>,
}

/// Abstract upstream spreadsheet interface.
///
/// Implementations must be thread-safe (Send + Sync) and support async
/// operations. The core treats every method as an awaited network call that
/// either succeeds or yields a structured error; no retries happen here.
#[async_trait]
pub trait SheetsClient: Send + Sync + 'static {
    /// Reads a single range of cells.
    async fn get_range(&self, params: &GetRangeParams) -> UpstreamResult<ValueRange>;

    /// Reads all ranges of one coalesced batch payload in a single call.
    async fn batch_get_ranges(&self, payload: &BatchPayload) -> UpstreamResult<BatchGetResponse>;

    /// Overwrites a range of cells and returns the written grid.
    async fn update_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>>;

    /// Appends rows after the table at `range` and returns the written grid.
    async fn append_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>>;

    /// Lists the sheet titles of a spreadsheet, in sheet order.
    async fn list_titles(&self, spreadsheet_id: &str) -> UpstreamResult<Vec<String>>;
}
