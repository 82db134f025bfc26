//! Flat applications: one answers row plus team and supervisor rows
//!
//! The science form lands in `answers`, the startup form in `answer_2`.
//! Both share the `team` table; only science has a supervisor.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::ApplicationKind;
use super::people::{Attachment, SupervisorContact, TeamMember};
use super::text;
use crate::error::Result;
use crate::hashing::{content_hash, iso_timestamp};
use crate::validation::{as_object, is_falsy, require_text, ValidationError};

/// Keys hashed for a science application, besides `timestamp`.
pub const SCIENCE_HASH_KEYS: &[&str] = &[
    "type",
    "title",
    "relevance",
    "goal",
    "tasks",
    "description",
    "expectedResults",
    "marketAssessment",
    "competitionAnalysis",
    "budgetBYN",
    "timeline",
    "team",
    "supervisor",
    "attachments",
    "additionalInfo",
];

/// Keys hashed for a startup application.
pub const STARTUP_HASH_KEYS: &[&str] = &[
    "type",
    "title",
    "problemStatementShort",
    "goal",
    "stageAndNextSteps",
    "description",
    "founderMotivationAndExpertise",
    "expectedResults",
    "benefitForBelarus",
    "marketAssessment",
    "monetization",
    "competitionAnalysis",
    "budgetBYN",
    "needsInvestmentNow",
    "timeline",
    "team",
    "attachments",
    "additionalInfo",
];

/// Science track form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScienceApplication {
    #[serde(default, deserialize_with = "text::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub relevance: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub tasks: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub expected_results: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub market_assessment: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub competition_analysis: Option<String>,
    #[serde(rename = "budgetBYN", default, deserialize_with = "text::text")]
    pub budget_byn: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "text::list")]
    pub team: Vec<TeamMember>,
    #[serde(default, deserialize_with = "text::object")]
    pub supervisor: Option<SupervisorContact>,
    #[serde(default, deserialize_with = "text::list")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "text::text")]
    pub additional_info: Option<String>,
}

/// Startup track form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupApplication {
    #[serde(default, deserialize_with = "text::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub problem_statement_short: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub stage_and_next_steps: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub founder_motivation_and_expertise: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub expected_results: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub benefit_for_belarus: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub market_assessment: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub monetization: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub competition_analysis: Option<String>,
    #[serde(rename = "budgetBYN", default, deserialize_with = "text::text")]
    pub budget_byn: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub needs_investment_now: Option<String>,
    #[serde(default, deserialize_with = "text::text")]
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "text::list")]
    pub team: Vec<TeamMember>,
    #[serde(default, deserialize_with = "text::list")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "text::text")]
    pub additional_info: Option<String>,
}

/// Typed view of a flat application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatApplication {
    Science(ScienceApplication),
    Startup(StartupApplication),
}

impl FlatApplication {
    pub fn kind(&self) -> ApplicationKind {
        match self {
            Self::Science(_) => ApplicationKind::Science,
            Self::Startup(_) => ApplicationKind::Startup,
        }
    }

    pub fn team(&self) -> &[TeamMember] {
        match self {
            Self::Science(app) => &app.team,
            Self::Startup(app) => &app.team,
        }
    }

    /// Supervisor worth storing, if any.
    pub fn supervisor(&self) -> Option<&SupervisorContact> {
        match self {
            Self::Science(app) => app.supervisor.as_ref().filter(|s| !s.is_empty()),
            Self::Startup(_) => None,
        }
    }
}

/// A validated flat application and the hash its rows will share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatIntake {
    pub application: FlatApplication,
    pub sha256: String,
}

impl FlatIntake {
    /// Science application (`type` must be `science`).
    ///
    /// The projection embeds `timestamp`, so two identical submissions get
    /// distinct hashes.
    pub fn science(raw: &Value, timestamp: NaiveDateTime) -> Result<Self> {
        let map = as_object(raw, "payload")?;
        ApplicationKind::Science.matches_submitted(require_text(map, "type")?)?;

        let application: ScienceApplication =
            serde_json::from_value(raw.clone()).map_err(ValidationError::payload)?;
        let sha256 = content_hash(&science_projection(map, timestamp))?;

        Ok(Self {
            application: FlatApplication::Science(application),
            sha256,
        })
    }

    /// Startup application (`type` must be `startup`).
    ///
    /// No timestamp: the hash depends on the submitted fields only.
    pub fn startup(raw: &Value) -> Result<Self> {
        let map = as_object(raw, "payload")?;
        ApplicationKind::Startup.matches_submitted(require_text(map, "type")?)?;

        let application: StartupApplication =
            serde_json::from_value(raw.clone()).map_err(ValidationError::payload)?;
        let sha256 = content_hash(&startup_projection(map))?;

        Ok(Self {
            application: FlatApplication::Startup(application),
            sha256,
        })
    }

    /// Envelope `{ "type": ..., "data": { ...form fields... } }`.
    ///
    /// The outer `type` selects the track and replaces any `type` inside
    /// `data`; the rest is handled exactly like the per-track endpoints.
    pub fn unified(raw: &Value, timestamp: NaiveDateTime) -> Result<Self> {
        let envelope = as_object(raw, "payload")?;
        let submitted = require_text(envelope, "type")?;
        let kind: ApplicationKind = submitted.parse()?;

        let mut data = match envelope.get("data") {
            Some(v) if !is_falsy(v) => as_object(v, "data")?.clone(),
            _ => Map::new(),
        };
        data.insert("type".to_owned(), Value::String(submitted.to_owned()));
        let normalized = Value::Object(data);

        match kind {
            ApplicationKind::Science => Self::science(&normalized, timestamp),
            ApplicationKind::Startup => Self::startup(&normalized),
        }
    }

    pub fn kind(&self) -> ApplicationKind {
        self.application.kind()
    }
}

fn raw_or_null(map: &Map<String, Value>, key: &str) -> Value {
    map.get(key).cloned().unwrap_or(Value::Null)
}

fn raw_or_default(map: &Map<String, Value>, key: &str, default: Value) -> Value {
    match map.get(key) {
        Some(v) if !is_falsy(v) => v.clone(),
        _ => default,
    }
}

/// Hash projection of a science application.
pub fn science_projection(map: &Map<String, Value>, timestamp: NaiveDateTime) -> Value {
    let mut projection = Map::new();
    for key in SCIENCE_HASH_KEYS {
        let value = match *key {
            "team" | "attachments" => raw_or_default(map, key, Value::Array(Vec::new())),
            "supervisor" => raw_or_default(map, key, Value::Object(Map::new())),
            _ => raw_or_null(map, key),
        };
        projection.insert((*key).to_owned(), value);
    }
    projection.insert(
        "timestamp".to_owned(),
        Value::String(iso_timestamp(timestamp)),
    );
    Value::Object(projection)
}

/// Hash projection of a startup application.
pub fn startup_projection(map: &Map<String, Value>) -> Value {
    let projection: Map<String, Value> = STARTUP_HASH_KEYS
        .iter()
        .map(|key| ((*key).to_owned(), raw_or_null(map, key)))
        .collect();
    Value::Object(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::hashing::{canonical_json, sha256_hex};
    use chrono::NaiveDate;
    use serde_json::json;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 500)
            .unwrap()
    }

    fn science_payload() -> Value {
        json!({
            "type": "science",
            "title": "Нейросеть для МРТ",
            "relevance": "High",
            "budgetBYN": 12000,
            "team": [
                {"fullName": "Иванов Иван Иванович", "faculty": "ФИТУ", "role": "Lead"},
                {"fullName": "Anna"}
            ],
            "supervisor": {"fullName": "Петров П. П.", "academicTitle": "к.т.н."},
            "attachments": [{"label": "Да", "url": "https://example.org/deck.pdf"}],
            "additionalInfo": ""
        })
    }

    #[test]
    fn science_hash_matches_documented_projection() {
        let intake = FlatIntake::science(&science_payload(), ts()).unwrap();

        let canonical = concat!(
            r#"{"additionalInfo": "", "attachments": [{"label": "Да", "url": "https://example.org/deck.pdf"}], "#,
            r#""budgetBYN": 12000, "competitionAnalysis": null, "description": null, "expectedResults": null, "#,
            r#""goal": null, "marketAssessment": null, "relevance": "High", "#,
            r#""supervisor": {"academicTitle": "к.т.н.", "fullName": "Петров П. П."}, "tasks": null, "#,
            r#""team": [{"faculty": "ФИТУ", "fullName": "Иванов Иван Иванович", "role": "Lead"}, {"fullName": "Anna"}], "#,
            r#""timeline": null, "timestamp": "2025-09-01T12:30:00.000500", "title": "Нейросеть для МРТ", "type": "science"}"#,
        );
        assert_eq!(
            canonical_json(&science_projection(science_payload().as_object().unwrap(), ts())).unwrap(),
            canonical
        );
        assert_eq!(intake.sha256, sha256_hex(canonical.as_bytes()));
        assert_eq!(intake.kind(), ApplicationKind::Science);
    }

    #[test]
    fn science_typed_view() {
        let intake = FlatIntake::science(&science_payload(), ts()).unwrap();
        let FlatApplication::Science(app) = &intake.application else {
            panic!("expected science");
        };
        assert_eq!(app.budget_byn.as_deref(), Some("12000"));
        assert_eq!(app.team.len(), 2);
        assert_eq!(intake.application.team()[1].name_parts().first_name.as_deref(), Some("Anna"));
        assert_eq!(
            intake.application.supervisor().and_then(|s| s.full_name.as_deref()),
            Some("Петров П. П.")
        );
    }

    #[test]
    fn science_defaults_for_missing_collections() {
        let payload = json!({"type": "science", "team": null, "supervisor": {}});
        let projection = science_projection(payload.as_object().unwrap(), ts());
        assert_eq!(projection["team"], json!([]));
        assert_eq!(projection["attachments"], json!([]));
        assert_eq!(projection["supervisor"], json!({}));

        let intake = FlatIntake::science(&payload, ts()).unwrap();
        assert!(intake.application.team().is_empty());
        assert!(intake.application.supervisor().is_none());
    }

    #[test]
    fn science_hash_changes_with_timestamp() {
        let a = FlatIntake::science(&science_payload(), ts()).unwrap();
        let later = ts() + chrono::Duration::seconds(1);
        let b = FlatIntake::science(&science_payload(), later).unwrap();
        assert_ne!(a.sha256, b.sha256);
    }

    #[test]
    fn startup_hash_is_deterministic() {
        let payload = json!({
            "type": "startup",
            "title": "Agro drone",
            "needsInvestmentNow": "yes",
            "team": [{"fullName": "Smith John"}]
        });
        let intake = FlatIntake::startup(&payload).unwrap();

        let canonical = concat!(
            r#"{"additionalInfo": null, "attachments": null, "benefitForBelarus": null, "budgetBYN": null, "#,
            r#""competitionAnalysis": null, "description": null, "expectedResults": null, "#,
            r#""founderMotivationAndExpertise": null, "goal": null, "marketAssessment": null, "#,
            r#""monetization": null, "needsInvestmentNow": "yes", "problemStatementShort": null, "#,
            r#""stageAndNextSteps": null, "team": [{"fullName": "Smith John"}], "timeline": null, "#,
            r#""title": "Agro drone", "type": "startup"}"#,
        );
        assert_eq!(intake.sha256, sha256_hex(canonical.as_bytes()));
        assert_eq!(FlatIntake::startup(&payload).unwrap().sha256, intake.sha256);
    }

    #[test]
    fn startup_hash_over_exotic_numbers() {
        let raw: Value = serde_json::from_str(
            r#"{"type":"startup","budgetBYN":1e21,"needsInvestmentNow":1e-7}"#,
        )
        .unwrap();
        let intake = FlatIntake::startup(&raw).unwrap();
        assert_eq!(
            intake.sha256,
            "f93595b150dc9b6a9e2729da16266fed0f6400c54e5813fc9ac6ed2084a38bef"
        );

        let raw: Value =
            serde_json::from_str(r#"{"type":"startup","budgetBYN":12345678901234567890123}"#)
                .unwrap();
        assert_eq!(
            FlatIntake::startup(&raw).unwrap().sha256,
            "85cef899bda8580426f40d5db9796838eb6274e8d3375efe7abb0502e32c545d"
        );
    }

    #[test]
    fn type_is_required() {
        let err = FlatIntake::science(&json!({"title": "x"}), ts()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Missing { ref field }) if field == "type"
        ));

        let err = FlatIntake::startup(&json!({"type": ""})).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Missing { .. })));
    }

    #[test]
    fn wrong_track_is_rejected() {
        let err = FlatIntake::startup(&json!({"type": "science"})).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::WrongKind { .. })));

        let err = FlatIntake::science(&json!({"type": "startup"}), ts()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::WrongKind { .. })));
    }

    #[test]
    fn bad_field_shape_is_a_validation_error() {
        let err = FlatIntake::startup(&json!({"type": "startup", "title": {"nested": 1}})).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Payload { .. })));
    }

    #[test]
    fn non_object_payload() {
        let err = FlatIntake::startup(&json!("startup")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotAnObject { field: "payload" })
        ));
    }

    #[test]
    fn unified_dispatches_on_outer_type() {
        let envelope = json!({"type": "science", "data": science_payload()});
        let unified = FlatIntake::unified(&envelope, ts()).unwrap();
        let direct = FlatIntake::science(&science_payload(), ts()).unwrap();
        assert_eq!(unified, direct);

        let envelope = json!({
            "type": "startup",
            "data": {"type": "science", "title": "Agro drone"}
        });
        let unified = FlatIntake::unified(&envelope, ts()).unwrap();
        assert_eq!(unified.kind(), ApplicationKind::Startup);
        let direct = FlatIntake::startup(&json!({"type": "startup", "title": "Agro drone"})).unwrap();
        assert_eq!(unified.sha256, direct.sha256);
    }

    #[test]
    fn unified_rejects_unknown_type_and_missing_type() {
        let err = FlatIntake::unified(&json!({"type": "hackathon", "data": {}}), ts()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidVariant { field: "type", .. })
        ));

        let err = FlatIntake::unified(&json!({"data": {}}), ts()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Missing { .. })));
    }

    #[test]
    fn unified_without_data() {
        let intake = FlatIntake::unified(&json!({"type": "startup"}), ts()).unwrap();
        assert_eq!(intake.application, FlatApplication::Startup(StartupApplication::default()));
    }
}
