//! Database layer - connection pool, schema, and repositories
//!
//! - Bounded connection pool shared by all handlers
//! - Idempotent migrations (`CREATE ... IF NOT EXISTS`)
//! - Multi-table intake writes run in one transaction

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::{create_lazy_pool, create_pool};
pub use repos::*;
