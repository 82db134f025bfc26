//! Team members, supervisors and attachments of flat applications

use serde::{Deserialize, Serialize};

use super::text;
use crate::names::{split_full_name, NameParts};

/// One team member as submitted by the application form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default, deserialize_with = "text::text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub faculty: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub key_skills: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub role: Option<String>,
}

impl TeamMember {
    /// Surname / first name / patronymic parsed from `fullName`.
    pub fn name_parts(&self) -> NameParts {
        split_full_name(self.full_name.as_deref().unwrap_or_default())
    }
}

/// Scientific supervisor of a science application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorContact {
    #[serde(default, deserialize_with = "text::text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub academic_title: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub email: Option<String>,
}

impl SupervisorContact {
    /// True when no field carries a value; such a supervisor is not stored.
    pub fn is_empty(&self) -> bool {
        [
            &self.full_name,
            &self.academic_title,
            &self.position,
            &self.phone,
            &self.email,
        ]
        .into_iter()
        .all(|field| text::non_blank(field).is_none())
    }
}

/// Attachment link. Only the first one is persisted.
///
/// The form uses `label` for the "looking for teammates" answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "text::text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub url: Option<String>,
}

/// `(label, url)` of the first attachment, if any.
pub fn first_attachment(attachments: &[Attachment]) -> (Option<String>, Option<String>) {
    attachments
        .first()
        .map(|a| (a.label.clone(), a.url.clone()))
        .unwrap_or_default()
}
