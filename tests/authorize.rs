//! Authorization hook behavior, driven through the full router with a fake
//! session provider.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use guestbook::handlers::images::ImagesClient;
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{app_with, memory_db, test_user, FixedSession};

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn post(path: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn app_redirects_to_login_without_session() {
    let app = app_with(Some(memory_db().await), Arc::new(FixedSession(None)), None);

    let response = app.oneshot(get("/app")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn app_subpaths_are_protected_too() {
    let app = app_with(Some(memory_db().await), Arc::new(FixedSession(None)), None);

    let response = app.oneshot(get("/app/anything")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn login_redirects_to_app_with_session() {
    let user = test_user("u1");
    let app = app_with(
        Some(memory_db().await),
        Arc::new(FixedSession(Some(user))),
        None,
    );

    let response = app.oneshot(get("/login")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/app");
}

#[tokio::test]
async fn register_redirects_to_app_with_session() {
    let user = test_user("u1");
    let app = app_with(
        Some(memory_db().await),
        Arc::new(FixedSession(Some(user))),
        None,
    );

    let response = app.oneshot(get("/register")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/app");
}

#[tokio::test]
async fn app_proceeds_with_identity_attached() {
    // The private-feed handler requires the CurrentUser extension; a 200
    // with the user's name in the page proves the hook attached it.
    let user = test_user("u1");
    let name = user.name.clone();
    let app = app_with(
        Some(memory_db().await),
        Arc::new(FixedSession(Some(user))),
        None,
    );

    let response = app.oneshot(get("/app")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains(&name));
}

#[tokio::test]
async fn login_page_renders_without_session() {
    let app = app_with(Some(memory_db().await), Arc::new(FixedSession(None)), None);

    let response = app.oneshot(get("/login")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_images_denied_without_session() {
    // No images client configured: if the handler ran anyway it would
    // produce a 500, so a 401 also proves the request never continued.
    let app = app_with(Some(memory_db().await), Arc::new(FixedSession(None)), None);

    let response = app.oneshot(post("/api/images")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn api_images_reaches_relay_with_session() {
    // Unreachable upstream: the request passes the hook and the single
    // upstream failure surfaces as a 500, no retry.
    let images = ImagesClient::with_endpoint("http://127.0.0.1:9/direct_upload", "token").unwrap();
    let app = app_with(
        Some(memory_db().await),
        Arc::new(FixedSession(Some(test_user("u1")))),
        Some(images),
    );

    let response = app.oneshot(post("/api/images")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn api_images_relays_upload_url_on_success() {
    // Local stand-in for the image-hosting API, answering with the
    // upstream's response shape.
    let upstream = axum::Router::new().route(
        "/direct_upload",
        axum::routing::post(|| async {
            axum::Json(serde_json::json!({
                "result": { "id": "abc123", "uploadURL": "https://upload.example/one-time" },
                "success": true
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let images =
        ImagesClient::with_endpoint(format!("http://{addr}/direct_upload"), "token").unwrap();
    let app = app_with(
        Some(memory_db().await),
        Arc::new(FixedSession(Some(test_user("u1")))),
        Some(images),
    );

    let response = app.oneshot(post("/api/images")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["uploadURL"], "https://upload.example/one-time");
}

#[tokio::test]
async fn unprotected_paths_proceed_without_session() {
    let app = app_with(Some(memory_db().await), Arc::new(FixedSession(None)), None);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_database_is_a_fatal_configuration_error() {
    let app = app_with(None, Arc::new(FixedSession(None)), None);

    // Even unprotected paths fail: the precondition sits at hook entry.
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The body stays generic; configuration detail is logged, not served.
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"internal server error");
}

#[tokio::test]
async fn missing_database_fails_protected_paths_too() {
    let app = app_with(None, Arc::new(FixedSession(Some(test_user("u1")))), None);

    let response = app.oneshot(get("/app")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
