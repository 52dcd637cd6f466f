//! Application state for HTTP handlers.

use std::sync::Arc;

use rsheets_domain::AliasTable;
use rsheets_server::handlers::{BatchGetHandler, TitlesHandler};
use rsheets_upstream::SheetsClient;

/// Application state shared across all HTTP handlers.
///
/// # Type Parameters
///
/// * `C` - The upstream client implementing `SheetsClient`
///
/// The upstream client is constructed once at startup and injected here;
/// handlers never build clients of their own.
pub struct AppState<C: SheetsClient> {
    /// The upstream spreadsheet client.
    pub client: Arc<C>,
    /// Configured symbolic spreadsheet names.
    pub aliases: Arc<AliasTable>,
    /// Handler for coalesced multi-range reads.
    pub batch_handler: Arc<BatchGetHandler<C>>,
    /// Handler for sheet title listing.
    pub titles_handler: Arc<TitlesHandler<C>>,
}

// Derived Clone would require C: Clone; the state only clones its Arcs.
impl<C: SheetsClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            aliases: Arc::clone(&self.aliases),
            batch_handler: Arc::clone(&self.batch_handler),
            titles_handler: Arc::clone(&self.titles_handler),
        }
    }
}

impl<C: SheetsClient> AppState<C> {
    /// Creates a new application state around an upstream client and the
    /// configured alias table.
    pub fn new(client: Arc<C>, aliases: AliasTable) -> Self {
        let aliases = Arc::new(aliases);
        let batch_handler = Arc::new(BatchGetHandler::new(
            Arc::clone(&client),
            Arc::clone(&aliases),
        ));
        let titles_handler = Arc::new(TitlesHandler::new(
            Arc::clone(&client),
            Arc::clone(&aliases),
        ));

        Self {
            client,
            aliases,
            batch_handler,
            titles_handler,
        }
    }
}
