//! Application intake endpoints
//!
//! Two payload families share this module:
//! - form-based (`/science`, `/startup`): answers keyed by form question id,
//!   plus participants and a supervisor
//! - flat (`/intake`, `/intake-startup`, `/intake-unified`): one record per
//!   track with team members and a supervisor contact
//!
//! Payloads are validated in full before anything is written.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use startlab_core::intake::{ApplicationKind, FlatIntake, FormApplication};
use startlab_core::ValidationError;

use crate::db::repos::{ApplicationGroup, FormRepo, IntakeRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{HashPath, JsonPayload};
use crate::http::server::AppState;

/// Reply to a form-based submission
#[derive(Debug, Serialize)]
pub struct FormSaved {
    pub message: &'static str,
    pub sha256_hash: String,
}

/// Reply to a flat submission
#[derive(Debug, Serialize)]
pub struct FlatSaved {
    pub message: &'static str,
    pub sha256: String,
}

async fn save_form_application(
    state: &AppState,
    raw: &serde_json::Value,
    kind: ApplicationKind,
) -> Result<FormSaved, ApiError> {
    let app = FormApplication::parse(raw, kind)?;

    let forms = FormRepo::new(&state.pool);
    let form = forms.find_form_by_name(kind.form_name_pattern()).await?;

    let question_ids: Vec<i64> = app.question_ids().collect();
    let foreign = forms.foreign_questions(form.id, &question_ids).await?;
    if let Some(&id) = foreign.first() {
        return Err(ValidationError::UnknownQuestion { id }.into());
    }

    let hash = app.group_hash(i64::from(form.id), Utc::now().naive_utc())?;
    IntakeRepo::new(&state.pool)
        .save_form(form.id, &app, &hash)
        .await?;

    Ok(FormSaved {
        message: kind.saved_message(),
        sha256_hash: hash,
    })
}

async fn save_flat_application(state: &AppState, intake: FlatIntake) -> Result<FlatSaved, ApiError> {
    IntakeRepo::new(&state.pool).save_flat(&intake).await?;
    Ok(FlatSaved {
        message: intake.kind().saved_message(),
        sha256: intake.sha256,
    })
}

/// POST /api/app/science
async fn submit_science(
    State(state): State<Arc<AppState>>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<FormSaved>, ApiError> {
    save_form_application(&state, &raw, ApplicationKind::Science)
        .await
        .map(Json)
}

/// POST /api/app/startup
async fn submit_startup(
    State(state): State<Arc<AppState>>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<FormSaved>, ApiError> {
    save_form_application(&state, &raw, ApplicationKind::Startup)
        .await
        .map(Json)
}

/// POST /api/app/intake - flat science application
async fn intake_science(
    State(state): State<Arc<AppState>>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<FlatSaved>, ApiError> {
    let intake = FlatIntake::science(&raw, Utc::now().naive_utc())?;
    save_flat_application(&state, intake).await.map(Json)
}

/// POST /api/app/intake-startup - flat startup application
async fn intake_startup(
    State(state): State<Arc<AppState>>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<FlatSaved>, ApiError> {
    let intake = FlatIntake::startup(&raw)?;
    save_flat_application(&state, intake).await.map(Json)
}

/// POST /api/app/intake-unified - `{type, data}` envelope
async fn intake_unified(
    State(state): State<Arc<AppState>>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<FlatSaved>, ApiError> {
    let intake = FlatIntake::unified(&raw, Utc::now().naive_utc())?;
    save_flat_application(&state, intake).await.map(Json)
}

/// GET /api/app/applications/{sha256}
async fn get_application(
    State(state): State<Arc<AppState>>,
    HashPath(hash): HashPath,
) -> Result<Json<ApplicationGroup>, ApiError> {
    let group = IntakeRepo::new(&state.pool).find_group(hash.as_str()).await?;
    Ok(Json(group))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/app/science", post(submit_science))
        .route("/api/app/startup", post(submit_startup))
        .route("/api/app/intake", post(intake_science))
        .route("/api/app/intake-startup", post(intake_startup))
        .route("/api/app/intake-unified", post(intake_unified))
        .route("/api/app/applications/{sha256}", get(get_application))
}
