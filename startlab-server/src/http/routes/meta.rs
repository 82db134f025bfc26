//! Service info endpoints: `/`, `/health`, `/config`

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct HealthConfig {
    pub project_name: String,
    pub version: String,
    pub environment: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub config: HealthConfig,
}

/// GET /
async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let project = &state.config.project;
    Json(RootResponse {
        message: format!("Welcome to {}!", project.name),
        version: project.version.clone(),
        description: project.description.clone(),
    })
}

/// GET /health
///
/// Liveness only; does not touch the database.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "API is running",
        config: HealthConfig {
            project_name: state.config.project.name.clone(),
            version: state.config.project.version.clone(),
            environment: state.config.environment.clone(),
        },
    })
}

/// GET /config - only in debug mode
async fn config(State(state): State<Arc<AppState>>) -> Json<Value> {
    if !state.config.debug {
        return Json(json!({ "message": "Configuration is hidden outside debug mode" }));
    }
    Json(state.config.public_view())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/config", get(config))
}
