//! Middleware components for request processing.

mod error_handler;
mod logging;
mod recovery;
mod request_id;

pub use error_handler::{
    INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE, error_to_status_code, not_found_handler,
    plain_text_error,
};
pub use logging::logging_middleware;
pub use recovery::recovery_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
