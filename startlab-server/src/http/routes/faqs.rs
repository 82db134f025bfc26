//! FAQ endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use startlab_core::MediaUrls;

use crate::db::repos::{ContentRepo, Faq};
use crate::http::error::ApiError;
use crate::http::extractors::RowId;
use crate::http::server::AppState;

/// FAQ entry with its image resolved to a public URL
#[derive(Serialize)]
pub struct FaqResponse {
    #[serde(flatten)]
    pub faq: Faq,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl FaqResponse {
    fn new(faq: Faq, media: &MediaUrls) -> Self {
        let image_url = media.resolve(faq.image.as_deref());
        Self { faq, image_url }
    }
}

/// GET /faqs - active entries in display order
async fn list_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FaqResponse>>, ApiError> {
    let faqs = ContentRepo::new(&state.pool).list_faqs().await?;
    tracing::debug!(count = faqs.len(), "Listed FAQ entries");
    Ok(Json(
        faqs.into_iter()
            .map(|f| FaqResponse::new(f, &state.media))
            .collect(),
    ))
}

/// GET /faqs/{id}
async fn get_faq(
    State(state): State<Arc<AppState>>,
    RowId(id): RowId,
) -> Result<Json<FaqResponse>, ApiError> {
    let faq = ContentRepo::new(&state.pool).get_faq(id).await?;
    Ok(Json(FaqResponse::new(faq, &state.media)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/faqs", get(list_faqs))
        .route("/faqs/", get(list_faqs))
        .route("/faqs/{id}", get(get_faq))
}
