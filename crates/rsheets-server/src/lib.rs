//! rsheets-server: Request handling core
//!
//! Sits between the HTTP surface (rsheets-api) and the upstream client
//! (rsheets-upstream):
//!
//! - [`config`]: YAML configuration with environment overrides
//! - [`handlers::batch`]: coalesced multi-range reads
//! - [`handlers::titles`]: sheet title listing with optional filtering

pub mod config;
pub mod handlers;

pub use config::{ConfigLoadError, ServerConfig};
