//! HTTP layer
//!
//! Axum server with:
//! - JSON error responses
//! - CORS, request tracing and timeouts
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
