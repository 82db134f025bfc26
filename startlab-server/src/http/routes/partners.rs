//! Partner endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use startlab_core::MediaUrls;

use crate::db::repos::{ContentRepo, Partner};
use crate::http::error::ApiError;
use crate::http::extractors::RowId;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct PartnerResponse {
    #[serde(flatten)]
    pub partner: Partner,
    #[serde(rename = "logoUrl")]
    pub logo_url: Option<String>,
}

impl PartnerResponse {
    /// Logos are linked under `/media/`, independent of `MEDIA_BASE_URL`.
    fn new(partner: Partner) -> Self {
        let logo_url = MediaUrls::local(partner.logo.as_deref());
        Self { partner, logo_url }
    }
}

/// GET /partners - by name
async fn list_partners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PartnerResponse>>, ApiError> {
    let partners = ContentRepo::new(&state.pool).list_partners().await?;
    Ok(Json(partners.into_iter().map(PartnerResponse::new).collect()))
}

/// GET /partners/{id}
async fn get_partner(
    State(state): State<Arc<AppState>>,
    RowId(id): RowId,
) -> Result<Json<PartnerResponse>, ApiError> {
    let partner = ContentRepo::new(&state.pool).get_partner(id).await?;
    Ok(Json(PartnerResponse::new(partner)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/partners", get(list_partners))
        .route("/partners/", get(list_partners))
        .route("/partners/{id}", get(get_partner))
}
