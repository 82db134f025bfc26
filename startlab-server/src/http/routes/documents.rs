//! Downloadable documents

use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;

const POSITION_FILENAME: &str = "position_sl.pdf";

/// GET /documents/position - competition regulations as a PDF attachment
async fn position(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = state
        .config
        .media
        .dir
        .join(&state.config.media.position_document);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Position document is missing");
            return Err(ApiError::NotFound {
                resource: "document",
                id: "position".to_owned(),
            });
        }
        Err(e) => {
            return Err(ApiError::internal(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={POSITION_FILENAME}"),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/documents/position", get(position))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::http::routes::test_support::{config, get_json, router_with};

    #[tokio::test]
    async fn serves_pdf_as_attachment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("regs.pdf"), b"%PDF-1.4 test").unwrap();

        let mut config = config();
        config.media.dir = dir.path().to_path_buf();
        config.media.position_document = "regs.pdf".into();

        let response = router_with(config)
            .oneshot(Request::get("/documents/position").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=position_sl.pdf"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn missing_document_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.media.dir = dir.path().to_path_buf();

        let (status, body) = get_json(router_with(config), "/documents/position").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn media_directory_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("news")).unwrap();
        std::fs::write(dir.path().join("news/cover.txt"), "cover").unwrap();

        let mut config = config();
        config.media.dir = dir.path().to_path_buf();

        let (status, body) =
            crate::http::routes::test_support::get(router_with(config), "/media/news/cover.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"cover");
    }
}
