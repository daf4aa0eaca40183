//! Application error type and the normalization table that maps every
//! failure onto a status code and a client-facing message.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use inkpost_core::error::{DomainError, RepoError};
use inkpost_core::ports::AuthError;
use inkpost_shared::ErrorResponse;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Application-level error type.
///
/// The explicit variants carry their own status and message; `Repo` and
/// `Token` wrap lower-level failures that are classified in `normalize`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Token(#[from] AuthError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Status code and message shown to the client.
    pub fn normalize(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Repo(err) => match err {
                RepoError::Cast { .. } | RepoError::NotFound => {
                    (StatusCode::NOT_FOUND, "Resource not found".to_string())
                }
                RepoError::Duplicate { field } => {
                    (StatusCode::BAD_REQUEST, format!("{field} already exists"))
                }
                RepoError::Validation(messages) => (
                    StatusCode::BAD_REQUEST,
                    format!("Validation failed: {}", messages.join(", ")),
                ),
                RepoError::Connection(_) | RepoError::Query(_) => internal(),
            },
            AppError::Token(err) => match err {
                AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
                AuthError::InvalidSignature | AuthError::MalformedToken(_) => {
                    (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
                }
                AuthError::MissingToken => {
                    (StatusCode::UNAUTHORIZED, "No token provided".to_string())
                }
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                AuthError::TokenCreation(_) | AuthError::Hashing(_) => internal(),
            },
            AppError::Internal(_) => internal(),
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR.to_string(),
    )
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.normalize().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, message) = self.normalize();
        HttpResponse::build(status).json(ErrorResponse::new(message))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            err @ DomainError::InvalidIdentifier { .. } => AppError::BadRequest(err.to_string()),
            err @ DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Repo(err) => AppError::Repo(err),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
