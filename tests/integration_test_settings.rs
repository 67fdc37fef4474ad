mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_settings_default_to_disabled() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/v1/admin/settings", true, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["admin_email"], "");
    assert_eq!(body["admin_notification_enabled"], false);
}

#[tokio::test]
async fn test_enabling_requires_valid_email() {
    let app = TestApp::new().await;

    let response = app.send("PUT", "/api/v1/admin/settings", true, Some(json!({
        "admin_email": "",
        "admin_notification_enabled": true
    }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send("PUT", "/api/v1/admin/settings", true, Some(json!({
        "admin_email": "not an email",
        "admin_notification_enabled": true
    }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send("GET", "/api/v1/admin/settings", true, None).await;
    assert_eq!(parse_body(response).await["admin_notification_enabled"], false);
}

#[tokio::test]
async fn test_saved_settings_drive_admin_copy() {
    let app = TestApp::new().await;
    let event = app.seed_event("Rust Workshop", None).await;

    let response = app.send("PUT", "/api/v1/admin/settings", true, Some(json!({
        "admin_email": " Office@College.edu ",
        "admin_notification_enabled": true
    }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["admin_email"], "office@college.edu");

    app.register(&event.id, "Ada Lovelace", "ada@example.com").await;
    assert_eq!(app.email.sent_to("office@college.edu").len(), 1);

    let response = app.send("PUT", "/api/v1/admin/settings", true, Some(json!({
        "admin_email": "office@college.edu",
        "admin_notification_enabled": false
    }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.register(&event.id, "Grace Hopper", "grace@example.com").await;
    assert_eq!(app.email.sent_to("office@college.edu").len(), 1);
}
