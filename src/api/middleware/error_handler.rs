//! Error handler for converting AppError to HTTP responses.
//!
//! Error bodies are plain text, one line, the way the webhook sender
//! expects them. Success bodies are JSON and handled by the handlers.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Body of the fallback route
pub const NOT_FOUND_MESSAGE: &str = "404 page not found";

/// Generic body for failures whose details stay in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Builds a `text/plain` error response with `message` and a trailing newline
pub fn plain_text_error(status: StatusCode, message: &str) -> Response {
    let mut response = (status, format!("{message}\n")).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - Forbidden → 403
    /// - BadRequest → 400
    /// - Platform, Dispatch, Timeout → 500 with the error text
    /// - Configuration, Internal → 500 with a generic text
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        match self {
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                plain_text_error(status, INTERNAL_ERROR_MESSAGE)
            }
            other => plain_text_error(status, &other.to_string()),
        }
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Platform(_)
        | AppError::Dispatch { .. }
        | AppError::Timeout { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Fallback for unmatched routes
pub async fn not_found_handler() -> Response {
    plain_text_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformError;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::Forbidden {
                    message: "x".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::BadRequest {
                    message: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Platform(PlatformError::new("GetUserByEmail", "x", "")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Timeout {
                    operation: "CreatePost".to_string(),
                    seconds: 3,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error_to_status_code(&error), expected, "{error:?}");
        }
    }

    #[tokio::test]
    async fn test_plain_text_headers() {
        let response = AppError::BadRequest {
            message: "Invalid request body".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(body_text(response).await, "Invalid request body\n");
    }

    #[tokio::test]
    async fn test_dispatch_error_text() {
        let response = AppError::Dispatch {
            source: PlatformError::new("CreatePost", "channel is archived", ""),
        }
        .into_response();
        assert_eq!(
            body_text(response).await,
            "Could not send DM to user: CreatePost: channel is archived\n"
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_not_exposed() {
        let response = AppError::from(anyhow::anyhow!("db password is hunter2")).into_response();
        assert_eq!(body_text(response).await, "Internal Server Error\n");
    }

    #[tokio::test]
    async fn test_not_found_handler() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 page not found\n");
    }
}
