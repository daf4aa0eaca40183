#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

#[actix_web::test]
async fn test_register_returns_token_and_user() {
    let app = init_app!(common::test_state());

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "email": "Alice@Example.com",
            "password": common::PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn test_register_validation() {
    let app = init_app!(common::test_state());

    let cases = [
        (
            json!({ "email": "a@example.com", "password": "secret123" }),
            "Username is required",
        ),
        (
            json!({ "username": "al", "email": "a@example.com", "password": "secret123" }),
            "Username must be between 3 and 30 characters",
        ),
        (
            json!({ "username": "alice", "email": "not-an-email", "password": "secret123" }),
            "Please provide a valid email",
        ),
        (
            json!({ "username": "alice", "email": "a@example.com", "password": "12345" }),
            "Password must be at least 6 characters",
        ),
    ];

    for (body, expected) in cases {
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], expected);
    }
}

#[actix_web::test]
async fn test_register_duplicate_user() {
    let app = init_app!(common::test_state());
    register!(app, "alice");

    for body in [
        json!({ "username": "alice", "email": "other@example.com", "password": "secret123" }),
        json!({ "username": "alice2", "email": "alice@example.com", "password": "secret123" }),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "User already exists");
    }
}

#[actix_web::test]
async fn test_login() {
    let app = init_app!(common::test_state());
    let (_, user_id) = register!(app, "alice");

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@example.com", "password": common::PASSWORD }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["id"], user_id.as_str());

    for (email, password) in [
        ("alice@example.com", "wrong-password"),
        ("nobody@example.com", common::PASSWORD),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_web::test]
async fn test_me() {
    let app = init_app!(common::test_state());
    let (token, user_id) = register!(app, "alice");

    let req = TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["username"], "alice");

    let req = TestRequest::get().uri("/api/auth/me").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
