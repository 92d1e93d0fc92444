//! HTTP Routes
//!
//! API Endpoints:
//! - /                              GET   服务说明
//! - /                              POST  表单 `channel` → 302 到 Feed
//! - /video/:video_id/track.mp3     GET   302 到音频流地址（HEAD 同）
//! - /feed/channel/:channel_id      GET   频道播客 RSS（HEAD 同）
//! - /api/ping                      GET   健康检查

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit_channel))
        .route("/video/:video_id/track.mp3", get(handlers::track))
        .route("/feed/channel/:channel_id", get(handlers::channel_feed))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(handlers::ping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        audio_stream, sample_video, StaticChannelDirectory, StaticDecipher, StaticVideoPlatform,
    };
    use crate::infrastructure::cache::DocumentTtlCache;
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::http::state::AppSettings;
    use crate::infrastructure::memory::InMemoryDocumentStore;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn app(platform: StaticVideoPlatform, directory: StaticChannelDirectory) -> axum::Router {
        let cache = DocumentTtlCache::new(Arc::new(InMemoryDocumentStore::new()), "cache");
        let state = AppState::new(
            Arc::new(cache),
            Arc::new(platform),
            Arc::new(StaticDecipher::default()),
            Arc::new(directory),
            AppSettings {
                public_base_url: "http://pod.example".to_string(),
                track_ttl: Duration::from_secs(60),
                resolve_deadline: Duration::from_secs(5),
            },
        );
        build_router(Arc::new(state))
    }

    fn playable() -> StaticVideoPlatform {
        StaticVideoPlatform::with_streams(vec![audio_stream(
            "https://media.example/audio?id=ulCdoCfw-bY",
            "",
        )])
    }

    async fn send(app: axum::Router, method: Method, uri: &str) -> axum::response::Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_track_redirects_to_media_url() {
        let response = send(
            app(playable(), StaticChannelDirectory::default()),
            Method::GET,
            "/video/ulCdoCfw-bY/track.mp3",
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://media.example/audio?id=ulCdoCfw-bY"
        );
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_track_head_redirects() {
        let response = send(
            app(playable(), StaticChannelDirectory::default()),
            Method::HEAD,
            "/video/ulCdoCfw-bY/track.mp3",
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_track_without_streams_is_not_found() {
        let response = send(
            app(StaticVideoPlatform::default(), StaticChannelDirectory::default()),
            Method::GET,
            "/video/ulCdoCfw-bY/track.mp3",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_track_upstream_failure_is_bad_gateway() {
        let response = send(
            app(
                StaticVideoPlatform::failing("LOGIN_REQUIRED"),
                StaticChannelDirectory::default(),
            ),
            Method::GET,
            "/video/ulCdoCfw-bY/track.mp3",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_feed_is_rss() {
        let directory = StaticChannelDirectory::with_channel(vec![sample_video("vid1", "First")]);
        let response = send(
            app(playable(), directory),
            Method::GET,
            "/feed/channel/UCsample",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let xml = String::from_utf8(body.to_vec()).unwrap();
        assert!(xml.contains("<title>Sample Channel</title>"));
        assert!(xml.contains("http://pod.example/video/vid1/track.mp3"));
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        let response = send(
            app(playable(), StaticChannelDirectory::default()),
            Method::GET,
            "/feed/channel/UCmissing",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_channel_url_redirects_to_feed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "channel=https%3A%2F%2Fwww.youtube.com%2Fchannel%2FUCsample%2Fvideos",
            ))
            .unwrap();

        let response = app(playable(), StaticChannelDirectory::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/feed/channel/UCsample");
    }

    #[tokio::test]
    async fn test_submit_empty_channel_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("channel="))
            .unwrap();

        let response = app(playable(), StaticChannelDirectory::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ping() {
        let response = send(
            app(playable(), StaticChannelDirectory::default()),
            Method::GET,
            "/api/ping",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
