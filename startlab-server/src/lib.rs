//! startlab-server: HTTP API for the StartLab competition platform
//!
//! Serves read-only site content (FAQ, news, partners), the form catalogue,
//! and the application intake endpoints. Every intake writes its rows in a
//! single transaction, tagged with a shared content hash.

pub mod db;
pub mod http;

pub use db::{create_pool, migrations, seed, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig};
