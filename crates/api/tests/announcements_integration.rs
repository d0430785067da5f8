//! Integration tests for the announcement ("notice") endpoints.

mod common;

use axum::http::Method;
use common::{assert_code, assert_ok, TestApp};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use serde_json::{json, Value};

async fn list(app: &TestApp, platform: &str) -> Value {
    app.get(&format!("/admin/notice/getNotice?platform={}", platform))
        .await
}

async fn add(app: &TestApp, title: &str, content: &str, platforms: &[&str]) -> Value {
    app.json(
        Method::PUT,
        "/admin/notice/addNotice",
        json!({"title": title, "content": content, "obj": "all", "platform": platforms}),
    )
    .await
}

#[tokio::test]
async fn test_add_requires_some_content() {
    let app = TestApp::spawn().await;
    let body = add(&app, "  ", "", &[&app.platform]).await;
    assert_code(&body, 20300);
    assert_eq!(list(&app, &app.platform).await["data"]["num"], 0);
}

#[tokio::test]
async fn test_add_fans_out_and_deduplicates_platforms() {
    let app = TestApp::spawn().await;
    let other = common::unique_platform();
    let title: String = Sentence(2..5).fake();
    let content: String = Paragraph(1..3).fake();

    let body = add(&app, &title, &content, &[&app.platform, &other, &app.platform]).await;
    assert_ok(&body);

    let first = list(&app, &app.platform).await;
    assert_eq!(first["data"]["num"], 1);
    let row = &first["data"]["notices"][0];
    assert_eq!(row["title"], title.as_str());
    assert_eq!(row["content"], content.as_str());
    assert_eq!(row["obj"], "all");
    assert_eq!(row["status"], 0);

    assert_eq!(list(&app, &other).await["data"]["num"], 1);
}

#[tokio::test]
async fn test_title_alone_is_enough() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, "Heads up", "", &[&app.platform]).await);
    assert_eq!(list(&app, &app.platform).await["data"]["num"], 1);
}

#[tokio::test]
async fn test_modify_publish_and_public_feed() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, "Draft", "body", &[&app.platform]).await);
    let newsid = list(&app, &app.platform).await["data"]["notices"][0]["newsid"]
        .as_i64()
        .unwrap();

    // Drafts stay out of the public feed.
    let public = app.public_get("/wusthelper/notice", Some(&app.platform)).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 0);

    let body = app
        .json(
            Method::PATCH,
            "/admin/notice/chNotice",
            json!({"newsid": newsid, "title": "Final", "obj": "students"}),
        )
        .await;
    assert_ok(&body);

    let body = app
        .json(
            Method::POST,
            "/admin/notice/publishNotice",
            json!({"newsid": [newsid]}),
        )
        .await;
    assert_ok(&body);
    assert_eq!(body["data"]["affected"], 1);

    let public = app.public_get("/wusthelper/notice", Some(&app.platform)).await;
    assert_ok(&public);
    let notices = public["data"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["newsid"], newsid);
    assert_eq!(notices[0]["title"], "Final");
    assert_eq!(notices[0]["obj"], "students");
    assert_eq!(notices[0]["content"], "body");
}

#[tokio::test]
async fn test_modify_status_back_to_draft() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, "t", "c", &[&app.platform]).await);
    let newsid = list(&app, &app.platform).await["data"]["notices"][0]["newsid"]
        .as_i64()
        .unwrap();
    app.json(
        Method::POST,
        "/admin/notice/publishNotice",
        json!({"newsid": [newsid]}),
    )
    .await;

    let body = app
        .json(
            Method::PATCH,
            "/admin/notice/chNotice",
            json!({"newsid": newsid, "status": 0}),
        )
        .await;
    assert_ok(&body);
    assert_eq!(list(&app, &app.platform).await["data"]["notices"][0]["status"], 0);
}

#[tokio::test]
async fn test_modify_errors() {
    let app = TestApp::spawn().await;

    let body = app
        .json(Method::PATCH, "/admin/notice/chNotice", json!({"newsid": 0}))
        .await;
    assert_code(&body, 10002);

    let body = app
        .json(
            Method::PATCH,
            "/admin/notice/chNotice",
            json!({"newsid": 987654321, "title": "x"}),
        )
        .await;
    assert_code(&body, 10005);
}

#[tokio::test]
async fn test_delete_removes_from_admin_list() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, "t", "c", &[&app.platform]).await);
    let newsid = list(&app, &app.platform).await["data"]["notices"][0]["newsid"]
        .as_i64()
        .unwrap();

    let body = app
        .json(
            Method::DELETE,
            "/admin/notice/deleteNotice",
            json!({"newsid": newsid}),
        )
        .await;
    assert_ok(&body);
    assert_eq!(list(&app, &app.platform).await["data"]["num"], 0);

    let body = app
        .json(
            Method::DELETE,
            "/admin/notice/deleteNotice",
            json!({"newsid": 987654321}),
        )
        .await;
    assert_code(&body, 10003);
}

#[tokio::test]
async fn test_publish_requires_ids() {
    let app = TestApp::spawn().await;
    let body = app
        .json(
            Method::POST,
            "/admin/notice/publishNotice",
            json!({"newsid": []}),
        )
        .await;
    assert_code(&body, 50101);
}
