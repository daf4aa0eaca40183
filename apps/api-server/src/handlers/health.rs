//! Health check and API index endpoints.

use actix_web::HttpResponse;
use serde::Serialize;

use inkpost_shared::MessageResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        message: "Server is running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

/// GET /api
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("Inkpost API is running"))
}
