//! Gateway tests driving the router directly

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use depot_gateway::{routes::create_router, AppState, GatewayConfig};
use depot_core::{open_store, Resource};
use std::sync::Arc;
use tower::ServiceExt;

/// Seed a store with one bucket, one channel, and two resources, then
/// build the router the way the server would.
async fn router(dir: &tempfile::TempDir) -> (axum::Router, String, String) {
    let config = GatewayConfig {
        bucket: "updater".to_string(),
        meta_root: dir.path().join("root"),
        data_root: dir.path().join("data"),
        ..Default::default()
    };

    let store = open_store(config.store_config()).await.unwrap();
    store.create_bucket("updater").await.unwrap();
    store.create_channel("updater", "channel-01").await.unwrap();
    let res1 = store
        .push("updater", "1/2/", "res.txt", b"0123456789")
        .await
        .unwrap();
    let res2 = store
        .push("updater", "1/", "res.txt", b"abcdefg")
        .await
        .unwrap();
    store.attach("updater", &res2, "channel-01").await.unwrap();

    let state = Arc::new(AppState::new(config).await.unwrap());
    (create_router(state), res1, res2)
}

fn fetch_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/fetch")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn fetch_returns_full_manifest_for_empty_channel() {
    let dir = tempfile::tempdir().unwrap();
    let (app, res1, res2) = router(&dir).await;

    let response = app
        .oneshot(fetch_request(r#"{"bucket":"updater","channel":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut listed: Vec<Resource> = serde_json::from_slice(&body).unwrap();
    listed.sort_by(|a, b| a.uuid.cmp(&b.uuid));
    let mut expected = vec![res1, res2];
    expected.sort();
    assert_eq!(
        listed.iter().map(|r| r.uuid.clone()).collect::<Vec<_>>(),
        expected
    );
}

#[tokio::test]
async fn fetch_filters_by_channel() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _res1, res2) = router(&dir).await;

    let response = app
        .oneshot(fetch_request(
            r#"{"bucket":"updater","channel":"channel-01"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listed: Vec<Resource> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, res2);
}

#[tokio::test]
async fn fetch_rejects_non_post() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = router(&dir).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/fetch")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn fetch_reports_storage_failures_as_500() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = router(&dir).await;

    let response = app
        .oneshot(fetch_request(r#"{"bucket":"no-such-bucket","channel":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("bucket not found"));
}

#[tokio::test]
async fn fetch_rejects_malformed_bodies_as_400() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = router(&dir).await;

    let response = app
        .oneshot(fetch_request("not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("malformed request"));
}

#[tokio::test]
async fn upgrade_serves_the_content_tree() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = router(&dir).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/upgrade/1/2/res.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), b"0123456789");
}

#[tokio::test]
async fn startup_fails_without_the_served_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig {
        bucket: "missing".to_string(),
        meta_root: dir.path().join("root"),
        data_root: dir.path().join("data"),
        ..Default::default()
    };

    assert!(AppState::new(config).await.is_err());
}
