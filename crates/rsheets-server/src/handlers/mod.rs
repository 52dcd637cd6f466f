//! Request handlers.

pub mod batch;
pub mod titles;

pub use batch::{BatchGetError, BatchGetHandler, BatchGetResult, MAX_BATCH_RANGES};
pub use titles::{SpreadsheetTitles, TitlesError, TitlesHandler, TitlesResult};
