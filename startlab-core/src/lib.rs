//! startlab-core: domain layer for the StartLab intake backend
//!
//! Holds everything that does not need a database or an HTTP stack:
//! - application payload types and their hash projections
//! - required-field validation
//! - canonical JSON serialization and the SHA-256 content hash
//! - full-name splitting for team members
//! - media URL resolution and service configuration

pub mod config;
pub mod error;
pub mod hashing;
pub mod intake;
pub mod media;
pub mod names;
pub mod validation;

pub use config::StartlabConfig;
pub use error::{CoreError, Result};
pub use hashing::{canonical_json, content_hash, iso_timestamp, ContentHash};
pub use intake::ApplicationKind;
pub use media::MediaUrls;
pub use names::{split_full_name, NameParts};
pub use validation::ValidationError;
