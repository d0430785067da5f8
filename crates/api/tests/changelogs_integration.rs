//! Integration tests for the changelog ("log") endpoints.

mod common;

use axum::http::Method;
use common::{assert_code, assert_ok, TestApp};
use serde_json::{json, Value};

async fn list(app: &TestApp, platform: &str) -> Value {
    app.get(&format!("/admin/log/getLog?page=1&size=5&platform={}", platform))
        .await
}

async fn add(app: &TestApp, version: &str) -> i64 {
    let body = app
        .json(
            Method::PUT,
            "/admin/log/addLog",
            json!({
                "title": "Release notes",
                "content": "Fixed the timetable import",
                "version": version,
                "platform": [app.platform],
            }),
        )
        .await;
    assert_ok(&body);
    list(app, &app.platform).await["data"]["logs"][0]["logid"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_add_trims_version_and_lists_date_only() {
    let app = TestApp::spawn().await;
    add(&app, "  3.2.1 ").await;

    let body = list(&app, &app.platform).await;
    assert_ok(&body);
    assert_eq!(body["data"]["num"], 1);
    let row = &body["data"]["logs"][0];
    assert_eq!(row["version"], "3.2.1");
    assert_eq!(row["status"], 0);
    // YYYY-MM-DD
    assert_eq!(row["updateTime"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn test_add_validation() {
    let app = TestApp::spawn().await;

    let body = app
        .json(
            Method::PUT,
            "/admin/log/addLog",
            json!({"title": "t", "version": " ", "platform": [app.platform]}),
        )
        .await;
    assert_code(&body, 50101);

    let body = app
        .json(
            Method::PUT,
            "/admin/log/addLog",
            json!({"title": "t", "version": "1.0", "platform": []}),
        )
        .await;
    assert_code(&body, 50101);
}

#[tokio::test]
async fn test_modify_publish_and_public_feed() {
    let app = TestApp::spawn().await;
    let logid = add(&app, "1.0.0").await;

    let body = app
        .json(
            Method::PATCH,
            "/admin/log/chLog",
            json!({"logid": logid, "version": "1.0.1"}),
        )
        .await;
    assert_ok(&body);

    let body = app
        .json(Method::POST, "/admin/log/publishLog", json!({"logid": [logid]}))
        .await;
    assert_ok(&body);
    assert_eq!(body["data"]["affected"], 1);

    let public = app.public_get("/wusthelper/log", Some(&app.platform)).await;
    assert_ok(&public);
    let logs = public["data"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["logid"], logid);
    assert_eq!(logs[0]["version"], "1.0.1");
    assert!(logs[0]["createTime"].is_string());
}

#[tokio::test]
async fn test_missing_changelog_is_log_not_found() {
    let app = TestApp::spawn().await;

    let body = app
        .json(
            Method::PATCH,
            "/admin/log/chLog",
            json!({"logid": 424242, "title": "x"}),
        )
        .await;
    assert_code(&body, 20301);

    let body = app.call(Method::DELETE, "/admin/log/deleteLog?logid=424242").await;
    assert_code(&body, 20301);
}

#[tokio::test]
async fn test_delete_changelog() {
    let app = TestApp::spawn().await;
    let logid = add(&app, "2.0").await;

    let body = app
        .call(Method::DELETE, &format!("/admin/log/deleteLog?logid={}", logid))
        .await;
    assert_ok(&body);
    assert_eq!(list(&app, &app.platform).await["data"]["num"], 0);

    // Deleted rows can no longer be edited.
    let body = app
        .json(
            Method::PATCH,
            "/admin/log/chLog",
            json!({"logid": logid, "title": "x"}),
        )
        .await;
    assert_code(&body, 20301);
}

#[tokio::test]
async fn test_service_version() {
    let app = TestApp::spawn().await;
    let body = app.get("/admin/log/getVersion").await;
    assert_ok(&body);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    // YYYY-MM-DD HH-MM-SS
    assert_eq!(body["data"]["time"].as_str().unwrap().len(), 19);
}
