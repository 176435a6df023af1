//! Panic recovery middleware.
//!
//! A panic inside request processing is logged with the request URL and a
//! backtrace, and answered with a generic 500. The server keeps running.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use futures::FutureExt;

use super::error_handler::{INTERNAL_ERROR_MESSAGE, plain_text_error};
use super::RequestId;

pub async fn recovery_middleware(request: Request, next: Next) -> Response {
    // path only, the query string carries the webhook secret
    let path = request.uri().path().to_string();
    let method = request.method().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            tracing::error!(
                method = %method,
                path = %path,
                request_id = %request_id,
                panic = %panic_message(payload.as_ref()),
                backtrace = %Backtrace::force_capture(),
                "Recovered from panic while handling request"
            );
            plain_text_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
