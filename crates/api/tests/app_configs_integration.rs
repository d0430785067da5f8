//! Integration tests for the feature-flag ("config") endpoints and the public
//! config payload.

mod common;

use axum::http::Method;
use common::{assert_code, assert_ok, TestApp};
use serde_json::{json, Value};

async fn add(app: &TestApp, platform: &str, name: &str, value: &str, value_type: i16) -> Value {
    app.json(
        Method::PUT,
        "/admin/config/addConfig",
        json!({
            "settingName": name,
            "currentSetting": value,
            "type": value_type,
            "content": "shown in settings",
            "platform": [platform],
            "optionList": ["a", "b"],
        }),
    )
    .await
}

async fn list(app: &TestApp, platform: &str) -> Value {
    app.get(&format!("/admin/config/getAllConfig?platform={}", platform))
        .await
}

async fn config_id(app: &TestApp, platform: &str, name: &str) -> i64 {
    list(app, platform).await["data"]["configs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["settingName"] == name)
        .unwrap_or_else(|| panic!("config {} not listed", name))["id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_add_and_list_select_config() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, &app.platform, "theme", "a", 1).await);

    let body = list(&app, &app.platform).await;
    assert_ok(&body);
    assert_eq!(body["data"]["num"], 1);
    let item = &body["data"]["configs"][0];
    assert_eq!(item["settingName"], "theme");
    assert_eq!(item["currentSetting"], "a");
    assert_eq!(item["type"], 1);
    assert_eq!(item["content"], "shown in settings");
    assert_eq!(
        item["optionsList"],
        json!([{"optionName": "a"}, {"optionName": "b"}])
    );
}

#[tokio::test]
async fn test_bool_config_gets_fixed_options() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, &app.platform, "darkMode", "true", 2).await);

    let item = &list(&app, &app.platform).await["data"]["configs"][0];
    assert_eq!(
        item["optionsList"],
        json!([{"optionName": "true"}, {"optionName": "false"}])
    );
}

#[tokio::test]
async fn test_bool_config_rejects_other_values() {
    let app = TestApp::spawn().await;
    assert_code(&add(&app, &app.platform, "darkMode", "yes", 2).await, 50101);

    assert_ok(&add(&app, &app.platform, "darkMode", "false", 2).await);
    let id = config_id(&app, &app.platform, "darkMode").await;

    let body = app
        .json(
            Method::PATCH,
            "/admin/config/chConfig",
            json!({"configId": id, "currentSetting": "maybe"}),
        )
        .await;
    assert_code(&body, 50101);

    // The option list of a bool config cannot be replaced.
    let body = app
        .json(
            Method::PATCH,
            "/admin/config/chConfig",
            json!({"configId": id, "currentSetting": "true", "optionList": ["x"]}),
        )
        .await;
    assert_ok(&body);

    let item = &list(&app, &app.platform).await["data"]["configs"][0];
    assert_eq!(item["currentSetting"], "true");
    assert_eq!(
        item["optionsList"],
        json!([{"optionName": "true"}, {"optionName": "false"}])
    );
}

#[tokio::test]
async fn test_modify_and_delete_errors() {
    let app = TestApp::spawn().await;

    let body = app
        .json(
            Method::PATCH,
            "/admin/config/chConfig",
            json!({"configId": 0, "currentSetting": "x"}),
        )
        .await;
    assert_code(&body, 10002);

    let body = app
        .json(
            Method::PATCH,
            "/admin/config/chConfig",
            json!({"configId": 31337, "currentSetting": "x"}),
        )
        .await;
    assert_code(&body, 10005);

    let body = app
        .call(Method::DELETE, "/admin/config/deleteConfig?configId=31337")
        .await;
    assert_code(&body, 10003);
}

#[tokio::test]
async fn test_delete_config() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, &app.platform, "banner", "on", 0).await);
    let id = config_id(&app, &app.platform, "banner").await;

    let body = app
        .call(
            Method::DELETE,
            &format!("/admin/config/deleteConfig?configId={}", id),
        )
        .await;
    assert_ok(&body);
    assert_eq!(list(&app, &app.platform).await["data"]["num"], 0);
}

#[tokio::test]
async fn test_platform_list_includes_new_platform() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, &app.platform, "theme", "a", 1).await);

    let body = app.get("/admin/config/getAllPlatform").await;
    assert_ok(&body);
    let platforms = body["data"]["platform"].as_array().unwrap();
    assert!(platforms.iter().any(|p| p == app.platform.as_str()));
}

#[tokio::test]
async fn test_public_config_native_layout() {
    let app = TestApp::spawn().await;
    assert_ok(&add(&app, &app.platform, "darkMode", "true", 2).await);
    assert_ok(&add(&app, &app.platform, "news", "https://news", 0).await);

    let body = app.public_get("/wusthelper/config", Some(&app.platform)).await;
    assert_ok(&body);
    let data = &body["data"];
    assert_eq!(data["darkMode"], 1);
    assert_eq!(data["news"], "https://news");
    assert!(data.get("menuList").is_none());
    assert!(data["termSetting"].is_array());
    assert!(data.get("version").is_none());
}

#[tokio::test]
async fn test_public_config_mini_program_layout() {
    let app = TestApp::spawn().await;
    let flag = common::unique_name("flag");
    assert_ok(&add(&app, "mp", &flag, "false", 2).await);
    assert_ok(&add(&app, "mp", "volunteer", "https://volunteer", 0).await);

    let body = app.public_get("/wusthelper/config", Some("mp")).await;
    assert_ok(&body);
    let data = &body["data"];
    assert_eq!(data[flag.as_str()], false);
    assert_eq!(data["menuList"]["volunteer"], "https://volunteer");
    assert!(data["schedule"].is_object());
    assert!(data["termList"].is_array());
    assert!(data.get("termSetting").is_none());

    // Leave the shared platform as it was.
    for name in [flag.as_str(), "volunteer"] {
        let id = config_id(&app, "mp", name).await;
        app.call(
            Method::DELETE,
            &format!("/admin/config/deleteConfig?configId={}", id),
        )
        .await;
    }
}

#[tokio::test]
async fn test_public_config_requires_platform() {
    let app = TestApp::spawn().await;
    let body = app.public_get("/wusthelper/config", None).await;
    assert_code(&body, 50101);
}
