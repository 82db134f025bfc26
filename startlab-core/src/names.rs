//! Full-name splitting for team members
//!
//! Forms collect a single `fullName` field ("Фамилия Имя Отчество"); the
//! team table stores the parts separately.

/// Name parts in surname-first order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
}

/// Split a full name on whitespace.
///
/// - 3+ words: last, first, and the remaining words as the middle name
/// - 2 words: last, first
/// - 1 word: first name only
/// - blank: nothing
pub fn split_full_name(full_name: &str) -> NameParts {
    let parts: Vec<&str> = full_name.split_whitespace().collect();

    match parts.as_slice() {
        [] => NameParts::default(),
        [first] => NameParts {
            first_name: Some((*first).to_owned()),
            ..NameParts::default()
        },
        [last, first] => NameParts {
            last_name: Some((*last).to_owned()),
            first_name: Some((*first).to_owned()),
            middle_name: None,
        },
        [last, first, rest @ ..] => NameParts {
            last_name: Some((*last).to_owned()),
            first_name: Some((*first).to_owned()),
            middle_name: Some(rest.join(" ")),
        },
    }
}

impl NameParts {
    /// Rejoin the parts surname-first, skipping absent ones.
    pub fn display(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
