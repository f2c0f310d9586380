//! orderdesk-server: HTTP service for users, orders and offers
//!
//! Three resources backed by SQLite, with join-based read views built
//! from explicit per-resource queries.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig};
