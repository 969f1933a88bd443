//! MCP server exposing a single read-only SQL query tool for ClickHouse

pub mod auth;
pub mod config;
mod error;
mod executor;
pub mod observability;
pub mod security;
pub mod server;
pub mod transport;

pub use config::{ClickHouseConfig, Config, TransportMode};
pub use error::{Error, Result};
pub use executor::{ClickHouseExecutor, QueryBackend, Row};
pub use security::{QueryGuard, Verdict};
pub use server::ServerHandler;
