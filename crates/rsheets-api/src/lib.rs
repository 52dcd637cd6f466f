//! rsheets-api: HTTP API layer
//!
//! This crate provides the HTTP surface of the service:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                rsheets-api                   │
//! ├─────────────────────────────────────────────┤
//! │  http/          - REST endpoints (Axum)      │
//! │  middleware/    - Request IDs, logging, CORS │
//! │  observability/ - Structured logging setup   │
//! │  validation     - Request input checks       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod http;
pub mod middleware;
pub mod observability;
pub mod validation;
