mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new();
    app.register("owner").await;

    let ok = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "owner", "password": "correct-horse" })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.json()["username"], "owner");

    let token = ok.json()["token"].as_str().unwrap().to_string();
    let walls = app.call(Method::GET, "/walls", Some(&token), None).await;
    assert_eq!(walls.status, StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_give_error_string() {
    let app = TestApp::new();
    app.register("owner").await;

    for (user, pass) in [("owner", "wrong-password"), ("nobody", "correct-horse")] {
        let reply = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": user, "password": pass })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.json()["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn duplicate_and_invalid_registration() {
    let app = TestApp::new();
    app.register("owner").await;

    let dup = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "owner", "password": "another-pass" })),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);

    let short = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "ab", "password": "correct-horse" })),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let weak = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "someone", "password": "short" })),
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new();

    let none = app.call(Method::GET, "/walls", None, None).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);

    let forged = app.call(Method::GET, "/walls", Some("not.a.jwt"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert!(forged.json()["error"].is_string());

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn incomplete_body_is_a_json_bad_request() {
    let app = TestApp::new();
    let reply = app
        .call(Method::POST, "/auth/register", None, Some(json!({ "username": "owner" })))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.json()["error"].is_string());
}
