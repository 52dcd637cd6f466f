//! Batch read handler implementation.

use std::sync::Arc;

use futures::future::try_join_all;

use rsheets_domain::{coalesce, AliasTable, BatchResult, RangeRequest};
use rsheets_upstream::SheetsClient;

use super::types::{BatchGetError, BatchGetResult, MAX_BATCH_RANGES};

/// Handler for coalesced multi-range reads.
///
/// Groups the requested ranges by `(spreadsheet id, dimension)`, drops exact
/// duplicates within each group, and launches the per-group upstream calls
/// concurrently. All calls are joined; the first failure fails the whole
/// request.
pub struct BatchGetHandler<C: SheetsClient> {
    /// Upstream client executing the per-group calls.
    client: Arc<C>,
    /// Alias table used both to resolve incoming references and to reattach
    /// symbolic names to results.
    aliases: Arc<AliasTable>,
}

impl<C: SheetsClient> BatchGetHandler<C> {
    /// Creates a new batch read handler.
    pub fn new(client: Arc<C>, aliases: Arc<AliasTable>) -> Self {
        Self { client, aliases }
    }

    /// Validates a batch read request.
    pub fn validate(&self, requests: &[RangeRequest]) -> BatchGetResult<()> {
        if requests.is_empty() {
            return Err(BatchGetError::EmptyBatch);
        }

        if requests.len() > MAX_BATCH_RANGES {
            return Err(BatchGetError::BatchTooLarge {
                size: requests.len(),
                max: MAX_BATCH_RANGES,
            });
        }

        for (index, request) in requests.iter().enumerate() {
            if request.range.trim().is_empty() {
                return Err(BatchGetError::InvalidRange {
                    index,
                    message: "range cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Executes a batch read.
    ///
    /// Results come back in group first-seen order, one result per distinct
    /// `(spreadsheet id, dimension)` group. When the resolved identifier has
    /// a configured alias, the result carries that symbolic name as well.
    pub async fn get_ranges(&self, requests: &[RangeRequest]) -> BatchGetResult<Vec<BatchResult>> {
        self.validate(requests)?;

        // Resolution failures abort before any upstream call is launched.
        let store = coalesce(&self.aliases, requests)?;

        tracing::debug!(
            requested = requests.len(),
            groups = store.len(),
            "Dispatching coalesced range groups"
        );

        let group_futures: Vec<_> = store
            .all_values()
            .map(|payload| self.client.batch_get_ranges(payload))
            .collect();

        let responses = try_join_all(group_futures).await?;

        Ok(responses
            .into_iter()
            .map(|response| BatchResult {
                spreadsheet: self
                    .aliases
                    .alias_for(&response.spreadsheet_id)
                    .map(String::from),
                spreadsheet_id: response.spreadsheet_id,
                value_ranges: response.value_ranges,
            })
            .collect())
    }
}
