//! API middleware.
//!
//! Includes:
//! - Request ID generation and propagation
//! - Request logging
//! - CORS configuration

mod logging;
mod request_id;

pub use logging::RequestLoggingLayer;
pub use request_id::{RequestIdLayer, REQUEST_ID_HEADER};

use tower_http::cors::{Any, CorsLayer};

/// Creates a CORS layer with permissive settings for development.
///
/// In production, you should restrict origins, methods, and headers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

#[cfg(test)]
mod tests;
