//! Questionnaire catalogue: submissions, their forms, and form questions

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{Form, FormQuestion, FormRepo, Submission};
use crate::http::error::ApiError;
use crate::http::extractors::RowId;
use crate::http::server::AppState;

/// GET /api/app/submissions
async fn list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let submissions = FormRepo::new(&state.pool).list_submissions().await?;
    Ok(Json(submissions))
}

/// GET /api/app/submissions/{id}/forms
async fn list_forms(
    State(state): State<Arc<AppState>>,
    RowId(submission_id): RowId,
) -> Result<Json<Vec<Form>>, ApiError> {
    let forms = FormRepo::new(&state.pool).list_forms(submission_id).await?;
    tracing::debug!(submission_id, count = forms.len(), "Listed forms");
    Ok(Json(forms))
}

/// GET /api/app/forms/{id}/questions
async fn list_questions(
    State(state): State<Arc<AppState>>,
    RowId(form_id): RowId,
) -> Result<Json<Vec<FormQuestion>>, ApiError> {
    let questions = FormRepo::new(&state.pool).list_questions(form_id).await?;
    Ok(Json(questions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/app/submissions", get(list_submissions))
        .route("/api/app/submissions/{id}/forms", get(list_forms))
        .route("/api/app/forms/{id}/questions", get(list_questions))
}
