//! Shared helpers for the HTTP integration tests.
//!
//! The app under test is the production route table and middleware stack,
//! backed by in-memory repositories.

#![allow(dead_code, unused_macros)]

use api_server::state::AppState;
use inkpost_infra::JwtConfig;

pub const PASSWORD: &str = "secret123";

pub fn test_state() -> AppState {
    AppState::in_memory(&JwtConfig::default())
}

/// State whose freshly minted tokens are already expired.
pub fn expired_token_state() -> AppState {
    AppState::in_memory(&JwtConfig {
        expiration_hours: -1,
        ..JwtConfig::default()
    })
}

/// Build the application service for a given `AppState`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(api_server::middleware::ErrorNormalizer::new(
                    api_server::config::Environment::Development,
                ))
                .wrap(api_server::observability::RequestTimer::new(
                    std::time::Duration::from_secs(1),
                ))
                .app_data(actix_web::web::Data::new($state))
                .configure(api_server::handlers::configure_routes)
                .default_service(actix_web::web::to(api_server::handlers::route_not_found)),
        )
        .await
    };
}

/// Register `username` and return `(token, user_id)`.
macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "username": $username,
                "email": format!("{}@example.com", $username),
                "password": common::PASSWORD,
            }))
            .to_request();
        let res = actix_web::test::call_service(&$app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = actix_web::test::read_body_json(res).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

/// Create a post as the bearer of `$token` and return its JSON.
macro_rules! create_post {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let res = actix_web::test::call_service(&$app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = actix_web::test::read_body_json(res).await;
        body
    }};
}
