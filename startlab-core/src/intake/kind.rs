//! Application kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The two competition tracks an application can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationKind {
    Science,
    Startup,
}

impl ApplicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::Startup => "startup",
        }
    }

    /// `ILIKE` pattern that finds this track's form by name.
    pub fn form_name_pattern(&self) -> &'static str {
        match self {
            Self::Science => "%наука%",
            Self::Startup => "%стартап%",
        }
    }

    /// Human-readable confirmation returned by intake endpoints.
    pub fn saved_message(&self) -> &'static str {
        match self {
            Self::Science => "Science application saved",
            Self::Startup => "Startup application saved",
        }
    }

    /// Check a submitted `type` value against the kind an endpoint serves.
    pub fn matches_submitted(self, submitted: &str) -> Result<Self, ValidationError> {
        match submitted.parse::<Self>() {
            Ok(kind) if kind == self => Ok(self),
            _ => Err(ValidationError::WrongKind {
                expected: self.as_str(),
                found: submitted.to_owned(),
            }),
        }
    }
}

impl FromStr for ApplicationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "science" => Ok(Self::Science),
            "startup" => Ok(Self::Startup),
            _ => Err(ValidationError::InvalidVariant {
                field: "type",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
