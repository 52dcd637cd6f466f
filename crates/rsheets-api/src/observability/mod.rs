//! Observability infrastructure.
//!
//! Structured logging configuration via `tracing-subscriber`.

mod logging;

pub use logging::{create_json_layer, init_logging, LoggingConfig};
