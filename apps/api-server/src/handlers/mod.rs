//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::{error, web};

use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("", web::get().to(health::index))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Post routes; writes require a bearer token
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        )
                        .route("/slug/{slug}", web::get().to(posts::get_post_by_slug))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::put().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        ),
                ),
        );
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> AppResult<actix_web::HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}

// Malformed bodies, query strings and path segments are client errors.

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid JSON body: {other}"),
        };
        AppError::BadRequest(message).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query parameters: {err}")).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path: {err}")).into())
}
