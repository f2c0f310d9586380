//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Every join is an explicit, named query in its repository
//! - Foreign keys are declared but not enforced; dangling references
//!   simply drop out of inner joins
//! - Transactions for multi-step operations

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options};
pub use repos::*;
