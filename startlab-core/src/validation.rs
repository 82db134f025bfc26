//! Validation error types and required-field helpers
//!
//! Every intake payload is checked in full before anything is written.

use serde_json::{Map, Value};
use thiserror::Error;

/// Validation error for intake payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent, null or blank
    #[error("{field} is required")]
    Missing { field: String },

    /// Required field absent inside one element of a list
    #[error("{collection}[{index}].{field} is required")]
    MissingInItem {
        collection: &'static str,
        index: usize,
        field: &'static str,
    },

    /// Value is not a JSON object where one is expected
    #[error("{field} must be a JSON object")]
    NotAnObject { field: &'static str },

    /// Application type does not match the endpoint
    #[error("type must be '{expected}', got '{found}'")]
    WrongKind { expected: &'static str, found: String },

    /// Invalid enum variant
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    /// String doesn't match required format
    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Payload could not be mapped onto the typed view
    #[error("invalid payload: {reason}")]
    Payload { reason: String },

    /// Answer references a question that is not part of the form
    #[error("form question {id} not found")]
    UnknownQuestion { id: i64 },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn payload(reason: impl ToString) -> Self {
        Self::Payload {
            reason: reason.to_string(),
        }
    }
}

/// JSON truthiness: null, false, 0, "", [] and {} are all falsy.
///
/// Optional sub-objects (`team`, `supervisor`, `attachments`) fall back to
/// their empty default whenever the submitted value is falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Borrow a payload as a JSON object.
pub fn as_object<'a>(
    value: &'a Value,
    field: &'static str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or(ValidationError::NotAnObject { field })
}

/// Read a required, non-blank string field.
pub fn require_text<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match map.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(ValidationError::missing(field)),
        Some(_) => Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a string",
        }),
    }
}
