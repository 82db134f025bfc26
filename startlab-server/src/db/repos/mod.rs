//! Repository implementations for database access
//!
//! - List queries carry their full `ORDER BY`; handlers never re-sort
//! - Lookups by id return `DbError::NotFound` instead of `Option`
//! - Intake writes run inside one transaction

pub mod content;
pub mod diagnostics;
pub mod forms;
pub mod intake;

pub use content::{ContentRepo, Faq, NewsItem, Partner};
pub use diagnostics::{DiagnosticsRepo, DatabaseInfo};
pub use forms::{Form, FormQuestion, FormRepo, Submission};
pub use intake::{
    ApplicationGroup, FlatSupervisorRow, FormAnswerRow, FormSupervisorRow, IntakeRepo,
    ParticipantRow, ScienceRow, StartupRow, TeamRow,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
