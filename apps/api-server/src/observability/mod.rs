//! Observability module - request timing.
//!
//! Request spans and ids come from `tracing_actix_web::TracingLogger`.

mod request_timer;

pub use request_timer::{RESPONSE_TIME_HEADER, RequestTimer};
