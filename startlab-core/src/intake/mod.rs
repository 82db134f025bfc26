//! Intake payloads
//!
//! Two families of applications reach the service:
//! - flat applications (`/intake`, `/intake-startup`, `/intake-unified`),
//!   stored in `answers` / `answer_2` with `team` and `supervisor_2` rows
//! - form-based applications (`/science`, `/startup`), stored as
//!   `form_answers` plus `participants` / `supervisors`
//!
//! Rows written for one submission share a content hash.

mod flat;
mod form;
mod kind;
mod people;
pub mod text;

pub use flat::{
    science_projection, startup_projection, FlatApplication, FlatIntake, ScienceApplication,
    StartupApplication, SCIENCE_HASH_KEYS, STARTUP_HASH_KEYS,
};
pub use form::{FormAnswer, FormApplication, Participant, Supervisor};
pub use kind::ApplicationKind;
pub use people::{first_attachment, Attachment, SupervisorContact, TeamMember};
