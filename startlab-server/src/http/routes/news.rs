//! News endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use startlab_core::MediaUrls;

use crate::db::repos::{ContentRepo, NewsItem};
use crate::http::error::ApiError;
use crate::http::extractors::RowId;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct NewsResponse {
    #[serde(flatten)]
    pub item: NewsItem,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl NewsResponse {
    fn new(item: NewsItem, media: &MediaUrls) -> Self {
        let image_url = media.resolve(item.image.as_deref());
        Self { item, image_url }
    }
}

/// GET /news - newest first
async fn list_news(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsResponse>>, ApiError> {
    let news = ContentRepo::new(&state.pool).list_news().await?;
    Ok(Json(
        news.into_iter()
            .map(|n| NewsResponse::new(n, &state.media))
            .collect(),
    ))
}

/// GET /news/{id}
async fn get_news(
    State(state): State<Arc<AppState>>,
    RowId(id): RowId,
) -> Result<Json<NewsResponse>, ApiError> {
    let item = ContentRepo::new(&state.pool).get_news(id).await?;
    Ok(Json(NewsResponse::new(item, &state.media)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(list_news))
        .route("/news/", get(list_news))
        .route("/news/{id}", get(get_news))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn absolute_image_urls_pass_through() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let item = NewsItem {
            id: 7,
            title: "Финал".into(),
            content: "...".into(),
            image: Some("https://cdn.example/final.jpg".into()),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        };
        let body = serde_json::to_value(NewsResponse::new(item, &MediaUrls::default())).unwrap();
        assert_eq!(body["imageUrl"], "https://cdn.example/final.jpg");
        assert_eq!(body["title"], "Финал");
    }

    #[test]
    fn missing_image_is_null() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let item = NewsItem {
            id: 8,
            title: "t".into(),
            content: "c".into(),
            image: Some(String::new()),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        };
        let body = serde_json::to_value(NewsResponse::new(item, &MediaUrls::default())).unwrap();
        assert!(body["imageUrl"].is_null());
    }
}
