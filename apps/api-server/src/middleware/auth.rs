//! Bearer-token authentication extractor.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use inkpost_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
///
/// On success the identity is also stored in the request extensions so
/// middleware can attribute failures to the caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })?;

    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.validate_token(token).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected bearer token");
        AppError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    let identity = Identity::from(claims);
    req.extensions_mut().insert(identity.clone());
    Ok(identity)
}

/// The token part of `Authorization: Bearer <token>`, if that scheme is used
/// and the token is not blank.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use inkpost_infra::JwtConfig;

    use super::*;

    fn state() -> AppState {
        AppState::in_memory(&JwtConfig::default())
    }

    fn extract(req: &HttpRequest) -> Result<Identity, AppError> {
        Identity::from_request(req, &mut Payload::None).into_inner()
    }

    const NO_TOKEN: &str = "No token provided";

    fn message(err: AppError) -> String {
        err.normalize().1
    }

    #[actix_web::test]
    async fn test_missing_header() {
        let req = TestRequest::default()
            .app_data(web::Data::new(state()))
            .to_http_request();

        assert_eq!(message(extract(&req).unwrap_err()), NO_TOKEN);
    }

    #[actix_web::test]
    async fn test_other_scheme() {
        let req = TestRequest::default()
            .app_data(web::Data::new(state()))
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();

        assert_eq!(message(extract(&req).unwrap_err()), NO_TOKEN);
    }

    #[actix_web::test]
    async fn test_blank_bearer_token() {
        for value in ["Bearer ", "Bearer    "] {
            let req = TestRequest::default()
                .app_data(web::Data::new(state()))
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();

            let err = extract(&req).unwrap_err();
            assert!(matches!(err, AppError::Token(AuthError::MissingToken)));
            assert_eq!(message(err), NO_TOKEN);
        }
    }

    #[actix_web::test]
    async fn test_garbage_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(state()))
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_http_request();

        assert_eq!(message(extract(&req).unwrap_err()), INVALID_TOKEN);
    }

    #[actix_web::test]
    async fn test_valid_token_sets_extension() {
        let state = state();
        let user_id = Uuid::new_v4();
        let token = state
            .tokens
            .generate_token(user_id, "writer", "writer@example.com")
            .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(state))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        let identity = extract(&req).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.username, "writer");
        assert_eq!(
            req.extensions().get::<Identity>().map(|i| i.user_id),
            Some(user_id)
        );
    }
}
