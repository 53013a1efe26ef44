use super::*;
use crate::config::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;


/// Helper to create an AppState backed by temp working directories
fn create_test_state(temp: &TempDir) -> AppState {
    let mut config = Config::default();
    // Point the service at a closed local port so no test ever leaves the host
    config.service.word_list_url = "http://127.0.0.1:9/list".to_string();
    config.service.word_detail_url = "http://127.0.0.1:9/detail".to_string();
    config.service.word_voice_url = "http://127.0.0.1:9/voice".to_string();
    config.storage.voice_dir = temp.path().join("voice");
    config.storage.deck_dir = temp.path().join("deck");
    config.storage.font_dir = temp.path().join("fonts");
    config.storage.ensure_directories().unwrap();
    AppState::new(Arc::new(config)).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp = TempDir::new().unwrap();
    let app = create_router(create_test_state(&temp));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let temp = TempDir::new().unwrap();
    let state = create_test_state(&temp);
    let app = create_router(state);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled_omits_headers() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.voice_dir = temp.path().join("voice");
    config.storage.deck_dir = temp.path().join("deck");
    config.storage.font_dir = temp.path().join("fonts");
    config.storage.ensure_directories().unwrap();
    config.api.cors_enabled = false;
    let app = create_router(AppState::new(Arc::new(config)).unwrap());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_openapi_endpoint_serves_spec() {
    let temp = TempDir::new().unwrap();
    let app = create_router(create_test_state(&temp));

    let response = get(app, "/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/create-apkg/"].is_object());
}
