//! HTTP REST API endpoints.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/sheets/range` | POST | Read one range |
//! | `/sheets/range` | PATCH | Overwrite one range |
//! | `/sheets/range/append` | POST | Append rows after a range |
//! | `/sheets/ranges` | POST | Coalesced multi-range read |
//! | `/sheets/titles` | POST | List sheet titles |
//! | `/sheets/batch/titles` | POST | List titles for several spreadsheets |
//! | `/health` | GET | Health check |
//!
//! Read endpoints use POST so that spreadsheet selectors, ranges, and
//! filters travel in a JSON body rather than the query string.

pub mod routes;
pub mod state;

pub use routes::{
    create_router, create_router_with_body_limit, ApiError, JsonBadRequest, DEFAULT_BODY_LIMIT,
};
pub use state::AppState;

#[cfg(test)]
mod tests;
