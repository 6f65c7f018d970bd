//! Local media server: serves stored card images over HTTP.
//!
//! Provides a simple Axum router that serves images by filename from the
//! image directory, with content-type and cache headers.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_inline_safe};

/// State shared by media server routes.
#[derive(Clone)]
pub struct MediaState {
    media_dir: Arc<PathBuf>,
}

/// Build the media server Axum router.
///
/// Mount at `/media` prefix:
///   GET /media/{filename}  — serve a stored image
pub fn media_router(media_dir: PathBuf) -> Router {
    let state = MediaState {
        media_dir: Arc::new(media_dir),
    };
    Router::new()
        .route("/{filename}", get(serve_media))
        .with_state(state)
}

/// GET /{filename} — read an image from the local store.
async fn serve_media(
    Path(filename): Path<String>,
    State(state): State<MediaState>,
) -> Response {
    // Basic path sanitization: reject traversal.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        warn!(filename = %filename, "Rejected suspicious media path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.media_dir.join(&filename);
    debug!(path = %path.display(), "Serving media file");

    match fs::read(&path).await {
        Ok(bytes) => {
            let mime = detect_mime_type(&path);
            let disposition = if is_inline_safe(mime) {
                format!("inline; filename=\"{filename}\"")
            } else {
                format!("attachment; filename=\"{filename}\"")
            };

            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, mime.parse().unwrap());
            headers.insert(
                header::CONTENT_DISPOSITION,
                disposition.parse().unwrap_or_else(|_| "inline".parse().unwrap()),
            );
            headers.insert(
                header::CACHE_CONTROL,
                "public, max-age=86400".parse().unwrap(),
            );
            headers.insert(
                header::CONTENT_LENGTH,
                bytes.len().to_string().parse().unwrap(),
            );

            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Media file not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read media file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read media").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_stored_image_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("card.png"), b"pixels").unwrap();
        let app = media_router(dir.path().to_path_buf());

        let response = app
            .oneshot(Request::builder().uri("/card.png").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=86400"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"pixels");
    }

    #[tokio::test]
    async fn unknown_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = media_router(dir.path().to_path_buf());

        let response = app
            .oneshot(Request::builder().uri("/nope.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn traversal_attempt_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = media_router(dir.path().to_path_buf());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/..%2Fcards.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
