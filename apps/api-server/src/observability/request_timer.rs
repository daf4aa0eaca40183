//! Request timing middleware - measures each request and flags slow ones.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Header carrying the elapsed handling time, e.g. `12.345ms`.
pub static RESPONSE_TIME_HEADER: &str = "x-response-time";

/// Middleware that times each request.
/// Entry and exit are logged at debug; requests slower than the threshold warn.
pub struct RequestTimer {
    threshold: Duration,
}

impl RequestTimer {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestTimerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimerService {
            service,
            threshold: self.threshold,
        }))
    }
}

pub struct RequestTimerService<S> {
    service: S,
    threshold: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let threshold = self.threshold;

        tracing::debug!(%method, %path, "Request started");
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let elapsed = started.elapsed();
            let millis = elapsed.as_secs_f64() * 1000.0;

            if let Ok(value) = HeaderValue::from_str(&format!("{millis:.3}ms")) {
                res.headers_mut()
                    .insert(HeaderName::from_static(RESPONSE_TIME_HEADER), value);
            }

            let status = res.status().as_u16();
            if elapsed > threshold {
                tracing::warn!(
                    %method,
                    %path,
                    status,
                    elapsed_ms = millis,
                    threshold_ms = threshold.as_millis() as u64,
                    "Slow request"
                );
            } else {
                tracing::debug!(%method, %path, status, elapsed_ms = millis, "Request completed");
            }

            Ok(res)
        })
    }
}
