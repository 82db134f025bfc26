//! Deployment diagnostics

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{DatabaseInfo, DiagnosticsRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/app/answers-columns
async fn answers_columns(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatabaseInfo>, ApiError> {
    let info = DiagnosticsRepo::new(&state.pool).info().await?;
    Ok(Json(info))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/app/answers-columns", get(answers_columns))
}
