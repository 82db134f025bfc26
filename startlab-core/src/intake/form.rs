//! Form-based applications: answers keyed by form question, plus participants
//!
//! Answers reference `form_questions` rows of the track's form. The group
//! hash can only be computed once the form id is known, so validation and
//! hashing are separate steps.

use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::kind::ApplicationKind;
use super::text;
use crate::error::Result;
use crate::hashing::{content_hash, iso_timestamp};
use crate::validation::{as_object, is_falsy, require_text, ValidationError};

/// Question id as sent by the form: a number or a numeric string.
fn question_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("form_question_id must be an integer")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom("form_question_id must be an integer")),
        Some(_) => Err(D::Error::custom("form_question_id must be an integer")),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAnswer {
    #[serde(default, deserialize_with = "question_id")]
    pub form_question_id: Option<i64>,
    #[serde(default, deserialize_with = "text::text")]
    pub answer_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, deserialize_with = "text::text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub middle_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub faculty: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub student_group: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub key_competencies: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub role_in_implementation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervisor {
    #[serde(default, deserialize_with = "text::text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub middle_name: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub academic_rank: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub email: Option<String>,
}

impl Supervisor {
    /// A supervisor row is written only when both name parts are present.
    pub fn is_named(&self) -> bool {
        text::non_blank(&self.last_name).is_some() && text::non_blank(&self.first_name).is_some()
    }
}

#[derive(Debug, Deserialize)]
struct FormPayload {
    #[serde(default, deserialize_with = "text::list")]
    answers: Vec<FormAnswer>,
    #[serde(default, deserialize_with = "text::list")]
    participants: Vec<Participant>,
    /// Left undecoded: only the science track reads it.
    #[serde(default)]
    supervisor: Value,
}

/// A validated form-based application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormApplication {
    pub kind: ApplicationKind,
    pub answers: Vec<FormAnswer>,
    pub participants: Vec<Participant>,
    /// Only kept for science, and only when named.
    pub supervisor: Option<Supervisor>,
    raw_answers: Value,
}

impl FormApplication {
    /// Parse and check a payload for the endpoint serving `kind`.
    pub fn parse(raw: &Value, kind: ApplicationKind) -> Result<Self> {
        let map = as_object(raw, "payload")?;
        kind.matches_submitted(require_text(map, "type")?)?;

        let payload: FormPayload =
            serde_json::from_value(raw.clone()).map_err(ValidationError::payload)?;

        for (index, answer) in payload.answers.iter().enumerate() {
            if matches!(answer.form_question_id, None | Some(0)) {
                return Err(ValidationError::MissingInItem {
                    collection: "answers",
                    index,
                    field: "form_question_id",
                }
                .into());
            }
        }

        for (index, participant) in payload.participants.iter().enumerate() {
            let required = [
                ("last_name", &participant.last_name),
                ("first_name", &participant.first_name),
            ];
            for (field, value) in required {
                if text::non_blank(value).is_none() {
                    return Err(ValidationError::MissingInItem {
                        collection: "participants",
                        index,
                        field,
                    }
                    .into());
                }
            }
        }

        let supervisor = match kind {
            ApplicationKind::Science if !is_falsy(&payload.supervisor) => {
                let supervisor: Supervisor = serde_json::from_value(payload.supervisor)
                    .map_err(ValidationError::payload)?;
                Some(supervisor).filter(Supervisor::is_named)
            }
            _ => None,
        };

        let raw_answers = match map.get("answers") {
            Some(v) if !is_falsy(v) => v.clone(),
            _ => Value::Array(Vec::new()),
        };

        Ok(Self {
            kind,
            answers: payload.answers,
            participants: payload.participants,
            supervisor,
            raw_answers,
        })
    }

    /// Question ids referenced by the answers, in submission order.
    pub fn question_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.answers.iter().filter_map(|a| a.form_question_id)
    }

    /// Group hash over `{form_id, answers, timestamp}`.
    ///
    /// Empty string when there are no answers.
    pub fn group_hash(&self, form_id: i64, timestamp: NaiveDateTime) -> Result<String> {
        if self.answers.is_empty() {
            return Ok(String::new());
        }
        content_hash(&json!({
            "form_id": form_id,
            "answers": self.raw_answers,
            "timestamp": iso_timestamp(timestamp),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::hashing::sha256_hex;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    fn science_payload() -> Value {
        json!({
            "type": "science",
            "answers": [
                {"form_question_id": 7, "answer_text": "Quantum sensors"},
                {"form_question_id": "8", "answer_text": 42}
            ],
            "participants": [
                {"last_name": "Иванов", "first_name": "Иван", "student_group": 250501}
            ],
            "supervisor": {"last_name": "Петров", "first_name": "Пётр", "academic_rank": "доцент"}
        })
    }

    #[test]
    fn parses_science_form() {
        let app = FormApplication::parse(&science_payload(), ApplicationKind::Science).unwrap();
        assert_eq!(app.question_ids().collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(app.answers[1].answer_text.as_deref(), Some("42"));
        assert_eq!(app.participants[0].student_group.as_deref(), Some("250501"));
        assert_eq!(
            app.supervisor.as_ref().and_then(|s| s.academic_rank.as_deref()),
            Some("доцент")
        );
    }

    #[test]
    fn group_hash_uses_raw_answers() {
        let app = FormApplication::parse(&science_payload(), ApplicationKind::Science).unwrap();
        let canonical = concat!(
            r#"{"answers": [{"answer_text": "Quantum sensors", "form_question_id": 7}, "#,
            r#"{"answer_text": 42, "form_question_id": "8"}], "form_id": 3, "#,
            r#""timestamp": "2025-03-14T09:26:53"}"#,
        );
        assert_eq!(app.group_hash(3, ts()).unwrap(), sha256_hex(canonical.as_bytes()));
        assert_ne!(app.group_hash(4, ts()).unwrap(), app.group_hash(3, ts()).unwrap());
    }

    #[test]
    fn no_answers_means_empty_hash() {
        let payload = json!({
            "type": "startup",
            "participants": [{"last_name": "Smith", "first_name": "Jane"}]
        });
        let app = FormApplication::parse(&payload, ApplicationKind::Startup).unwrap();
        assert_eq!(app.group_hash(1, ts()).unwrap(), "");
        assert_eq!(app.participants.len(), 1);
    }

    #[test]
    fn startup_drops_supervisor() {
        let mut payload = science_payload();
        payload["type"] = json!("startup");
        let app = FormApplication::parse(&payload, ApplicationKind::Startup).unwrap();
        assert!(app.supervisor.is_none());
    }

    #[test]
    fn startup_ignores_malformed_supervisor() {
        let payload = json!({
            "type": "startup",
            "answers": [{"form_question_id": 1, "answer_text": "x"}],
            "supervisor": "n/a"
        });
        let app = FormApplication::parse(&payload, ApplicationKind::Startup).unwrap();
        assert!(app.supervisor.is_none());
        assert_eq!(app.answers.len(), 1);
    }

    #[test]
    fn science_rejects_malformed_supervisor() {
        let mut payload = science_payload();
        payload["supervisor"] = json!("n/a");
        let err = FormApplication::parse(&payload, ApplicationKind::Science).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Payload { .. })));
    }

    #[test]
    fn unnamed_supervisor_is_skipped() {
        let mut payload = science_payload();
        payload["supervisor"] = json!({"last_name": "Петров", "position": "Dean"});
        let app = FormApplication::parse(&payload, ApplicationKind::Science).unwrap();
        assert!(app.supervisor.is_none());
    }

    #[test]
    fn type_must_match_endpoint() {
        let err = FormApplication::parse(&science_payload(), ApplicationKind::Startup).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::WrongKind { .. })));

        let err = FormApplication::parse(&json!({}), ApplicationKind::Science).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Missing { .. })));
    }

    #[test]
    fn answer_needs_question_id() {
        for bad in [json!({"answer_text": "x"}), json!({"form_question_id": 0}), json!({"form_question_id": ""})] {
            let payload = json!({"type": "science", "answers": [{"form_question_id": 1}, bad]});
            let err = FormApplication::parse(&payload, ApplicationKind::Science).unwrap_err();
            assert_eq!(
                err.to_string(),
                "answers[1].form_question_id is required"
            );
        }
    }

    #[test]
    fn non_numeric_question_id_is_a_payload_error() {
        let payload = json!({"type": "science", "answers": [{"form_question_id": "abc"}]});
        let err = FormApplication::parse(&payload, ApplicationKind::Science).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Payload { .. })));
    }

    #[test]
    fn participant_needs_both_names() {
        let payload = json!({
            "type": "startup",
            "participants": [{"last_name": "Smith", "first_name": " "}]
        });
        let err = FormApplication::parse(&payload, ApplicationKind::Startup).unwrap_err();
        assert_eq!(err.to_string(), "participants[0].first_name is required");
    }
}
