//! Handler tests driving the real router against the in-memory record
//! store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::Duration;
use opto_catalog_api::config::AppConfig;
use opto_catalog_api::routes::build_router;
use opto_catalog_api::state::AppState;
use opto_catalog_core::auth::{issue_token, Role};
use opto_catalog_core::events::bus::EventBus;
use opto_catalog_core::store::MemoryRecordStore;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_min_connections: 0,
        jwt_secret: SECRET.to_string(),
        event_bus_capacity: 16,
        log_level: "info".to_string(),
    };
    build_router(AppState::new(
        Arc::new(MemoryRecordStore::new()),
        config,
        EventBus::new(16),
    ))
}

fn editor_token() -> String {
    issue_token(
        "editor@example.com",
        Role::Mitarbeiter,
        Duration::hours(1),
        SECRET,
    )
    .unwrap()
}

fn customer_token() -> String {
    issue_token(
        "shopper@example.com",
        Role::Customer,
        Duration::hours(1),
        SECRET,
    )
    .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ping_answers_without_a_store_round_trip() {
    let app = test_app();
    let response = app
        .oneshot(request(Method::GET, "/v1/ping", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_store_and_subscribers() {
    let app = test_app();
    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "reachable");
}

#[tokio::test]
async fn empty_catalog_has_both_partitions() {
    let app = test_app();
    let response = app
        .oneshot(request(Method::GET, "/v1/products", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "de": [], "en": [] }));
}

#[tokio::test]
async fn writes_require_a_token() {
    let app = test_app();
    let response = app
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            None,
            Some(json!({ "de": [] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customers_may_not_write() {
    let app = test_app();
    let response = app
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&customer_token()),
            Some(json!({ "de": [] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "forbidden");
}

#[tokio::test]
async fn upsert_then_fetch_presents_canonical_categories() {
    let app = test_app();
    let token = editor_token();

    let put = app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&token),
            Some(json!({
                "de": [{
                    "contentId": "mvpulse-2",
                    "name": "MVpulse 2",
                    "category": "Laser",
                    "features": ["TTL-Modulation"]
                }]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::OK);
    let saved = json_body(put).await;
    assert_eq!(saved["de"][0]["category"], "Machine Vision Lasermodule");

    let get = app
        .oneshot(request(Method::GET, "/v1/products", None, None))
        .await
        .unwrap();
    let body = json_body(get).await;
    assert_eq!(body["de"][0]["contentId"], "mvpulse-2");
    assert_eq!(body["de"][0]["category"], "Machine Vision Lasermodule");
    assert_eq!(body["en"], json!([]));
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_400() {
    let app = test_app();
    let response = app
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&editor_token()),
            Some(json!({ "de": [{ "contentId": "mvpulse-2", "name": "" }] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "badRequest");
}

#[tokio::test]
async fn delete_removes_the_record_in_both_languages() {
    let app = test_app();
    let token = editor_token();

    app.clone()
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&token),
            Some(json!({
                "de": [{ "contentId": "mvpulse", "name": "MVpulse" }],
                "en": [{ "contentId": "mvpulse", "name": "MVpulse" }]
            })),
        ))
        .await
        .unwrap();

    let delete = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            "/v1/products/mvpulse",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let body = json_body(
        app.clone()
            .oneshot(request(Method::GET, "/v1/products", None, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body, json!({ "de": [], "en": [] }));

    let again = app
        .oneshot(request(
            Method::DELETE,
            "/v1/products/mvpulse",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn link_rekeys_the_target_language_row() {
    let app = test_app();
    let token = editor_token();

    app.clone()
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&token),
            Some(json!({
                "de": [{ "contentId": "machine-vision-new", "name": "Machine Vision Neu" }],
                "en": [{ "contentId": "old-mv-en", "name": "Machine Vision" }]
            })),
        ))
        .await
        .unwrap();

    let link = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/v1/products/link",
            Some(&token),
            Some(json!({
                "sourceContentId": "machine-vision-new",
                "targetContentId": "old-mv-en",
                "targetLanguage": "en"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(link.status(), StatusCode::OK);
    let linked = json_body(link).await;
    assert_eq!(linked["contentId"], "machine-vision-new");
    assert_eq!(linked["language"], "en");

    let body = json_body(
        app.oneshot(request(Method::GET, "/v1/products", None, None))
            .await
            .unwrap(),
    )
    .await;
    let english_ids: Vec<&str> = body["en"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["contentId"].as_str().unwrap())
        .collect();
    assert_eq!(english_ids, vec!["machine-vision-new"]);
}

#[tokio::test]
async fn link_to_an_occupied_destination_is_a_conflict() {
    let app = test_app();
    let token = editor_token();

    app.clone()
        .oneshot(request(
            Method::PUT,
            "/v1/products",
            Some(&token),
            Some(json!({
                "de": [{ "contentId": "mvpulse", "name": "MVpulse" }],
                "en": [
                    { "contentId": "mvpulse", "name": "MVpulse" },
                    { "contentId": "other", "name": "Other" }
                ]
            })),
        ))
        .await
        .unwrap();

    let link = app
        .oneshot(request(
            Method::POST,
            "/v1/products/link",
            Some(&token),
            Some(json!({
                "sourceContentId": "mvpulse",
                "targetContentId": "other",
                "targetLanguage": "en"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(link.status(), StatusCode::CONFLICT);
    let body = json_body(link).await;
    assert_eq!(body["error"]["type"], "conflict");
}

#[tokio::test]
async fn faqs_come_back_grouped_and_ordered() {
    let app = test_app();
    let token = editor_token();

    app.clone()
        .oneshot(request(
            Method::PUT,
            "/v1/faqs",
            Some(&token),
            Some(json!({
                "de": [
                    { "contentId": "versand-dauer", "question": "Wie lange dauert der Versand?",
                      "answer": "2-3 Werktage", "category": "Versand", "orderIndex": 2 },
                    { "contentId": "versand-kosten", "question": "Was kostet der Versand?",
                      "answer": "Ab 5 Euro", "category": "Versand", "orderIndex": 1 },
                    { "contentId": "garantie", "question": "Wie lange ist die Garantie?",
                      "answer": "24 Monate", "category": "Service", "orderIndex": 1 }
                ]
            })),
        ))
        .await
        .unwrap();

    let body = json_body(
        app.oneshot(request(Method::GET, "/v1/faqs", None, None))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["de"][0]["category"], "Service");
    assert_eq!(body["de"][1]["category"], "Versand");
    assert_eq!(
        body["de"][1]["questions"][0]["contentId"],
        "versand-kosten"
    );
    assert_eq!(body["de"][1]["questions"][1]["contentId"], "versand-dauer");
    assert_eq!(body["en"], json!([]));
}

#[tokio::test]
async fn careers_sort_published_first_drafts_last() {
    let app = test_app();
    let token = editor_token();

    app.clone()
        .oneshot(request(
            Method::PUT,
            "/v1/careers",
            Some(&token),
            Some(json!({
                "en": [
                    { "contentId": "draft-role", "title": "Draft Role", "isPublished": false },
                    { "contentId": "live-role", "title": "Live Role", "isPublished": true }
                ]
            })),
        ))
        .await
        .unwrap();

    let body = json_body(
        app.oneshot(request(Method::GET, "/v1/careers", None, None))
            .await
            .unwrap(),
    )
    .await;
    let ids: Vec<&str> = body["en"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["contentId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["live-role", "draft-role"]);
    assert!(body["en"][0]["publishedAt"].is_string());
    assert!(body["en"][1]["publishedAt"].is_null());
}
