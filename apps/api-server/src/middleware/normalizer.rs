//! Error normalization middleware.
//!
//! Every failed request leaves through here: the error is classified by
//! `AppError::normalize` (or by its own status for framework errors), logged
//! with request context, and rendered as `{"success": false, "error": ...}`.

use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::StatusCode,
};
use inkpost_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use crate::config::Environment;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, INTERNAL_SERVER_ERROR};

/// Error normalization middleware factory.
pub struct ErrorNormalizer {
    environment: Environment,
}

impl ErrorNormalizer {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorNormalizer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorNormalizerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorNormalizerService {
            service,
            environment: self.environment,
        }))
    }
}

pub struct ErrorNormalizerService<S> {
    service: S,
    environment: Environment,
}

impl<S, B> Service<ServiceRequest> for ErrorNormalizerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let environment = self.environment;
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            let Some(failure) = res.response().error().map(Failure::from_error) else {
                return Ok(res.map_into_left_body());
            };
            failure.log(res.request());

            let mut body = ErrorResponse::new(failure.message);
            if environment.is_development() {
                body = body.with_details(failure.details);
            }
            let response = HttpResponse::build(failure.status).json(body);

            Ok(res.into_response(response).map_into_right_body())
        })
    }
}

/// A classified request failure.
struct Failure {
    status: StatusCode,
    message: String,
    details: String,
}

impl Failure {
    fn from_error(err: &Error) -> Self {
        let (status, message) = match err.as_error::<AppError>() {
            Some(app_error) => app_error.normalize(),
            None => {
                let status = err.as_response_error().status_code();
                if status.is_server_error() {
                    (status, INTERNAL_SERVER_ERROR.to_string())
                } else {
                    (status, err.to_string())
                }
            }
        };

        Self {
            status,
            message,
            details: format!("{err:?}"),
        }
    }

    fn log(&self, req: &HttpRequest) {
        let user = req
            .extensions()
            .get::<Identity>()
            .map(|identity| identity.user_id.to_string());
        let ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let user = user.as_deref().unwrap_or("anonymous");

        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                details = %self.details,
                path = %req.path(),
                method = %req.method(),
                ip = %ip,
                user = %user,
                "{}",
                self.message
            );
        } else {
            tracing::warn!(
                status = self.status.as_u16(),
                details = %self.details,
                path = %req.path(),
                method = %req.method(),
                ip = %ip,
                user = %user,
                "{}",
                self.message
            );
        }
    }
}
