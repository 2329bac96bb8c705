//! Favorites, region table and the shopping assistant.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use shopyz_core::Language;
use shopyz_integration_tests::{ScriptedCopywriter, TestApp};
use shopyz_storefront::db::MemoryProductStore;

#[tokio::test]
async fn test_toggle_favorite() {
    let mut app = TestApp::new().await;

    let response = app.post("/favorites/2/toggle", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["liked"], true);
    assert_eq!(response.body["count"], 1);

    let response = app.get("/favorites").await;
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["products"][0]["id"], "2");

    let response = app.get("/products/2").await;
    assert_eq!(response.body["isFavorite"], true);

    let response = app.post("/favorites/2/toggle", json!({})).await;
    assert_eq!(response.body["liked"], false);
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_favorites_skip_deleted_products() {
    let mut app = TestApp::new().await;
    app.post("/favorites/3/toggle", json!({})).await;
    app.login_admin().await;
    app.delete("/admin/products/3").await;

    let response = app.get("/favorites").await;
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_region_table() {
    let mut app = TestApp::new().await;

    let response = app.get("/regions").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["defaultRegion"], "16 - Alger");
    let regions = response.body["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 58);
    assert_eq!(regions[0]["region"], "01 - Adrar");
}

#[tokio::test]
async fn test_welcome_in_language() {
    let mut app = TestApp::new().await;

    let response = app.get("/chat/welcome?lang=FR").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "model");
    assert_eq!(response.body["text"], Language::Fr.assistant_welcome());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let mut app = TestApp::new().await;

    let response = app.post("/chat", json!({ "message": "  \n" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_without_copywriter_apologizes() {
    let mut app = TestApp::new().await;

    let response = app
        .post("/chat", json!({ "message": "Any lamps?", "language": "AR" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reply"]["text"], Language::Ar.assistant_unavailable());
    assert_eq!(response.body["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_reply_sees_catalog_and_history() {
    let store = Arc::new(MemoryProductStore::new());
    let mut app = TestApp::with(store, Some(ScriptedCopywriter::shared())).await;

    let welcome = app.get("/chat/welcome").await.body;
    let response = app
        .post(
            "/chat",
            json!({ "messages": [welcome], "message": "  gift ideas  " }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let messages = response.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["text"], "gift ideas");
    assert_eq!(response.body["reply"]["text"], "4 products match 'gift ideas'");
    assert_eq!(messages[2], response.body["reply"]);
}

#[tokio::test]
async fn test_chat_failure_apologizes() {
    let store = Arc::new(MemoryProductStore::new());
    let mut app = TestApp::with(store, Some(ScriptedCopywriter::failing())).await;

    let response = app.post("/chat", json!({ "message": "hello" })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reply"]["text"], Language::En.assistant_unavailable());
}
