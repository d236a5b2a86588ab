use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::envelope::Envelope;
use crate::error::AppError;

pub const PAGE_NOT_FOUND_MESSAGE: &str = "Page does not exist.";
pub const WRITE_FAILED_MESSAGE: &str = "Could not write page.";
pub const LIST_FAILED_MESSAGE: &str = "Could not list pages.";

/// Domain failures are reported inside the JSON envelope with a 200 status.
/// Anything else becomes an empty 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::PageNotFound(_) | AppError::InvalidSlug(_) => PAGE_NOT_FOUND_MESSAGE.to_string(),
            AppError::WriteFailed(_) => WRITE_FAILED_MESSAGE.to_string(),
            AppError::DirectoryRead(_) => LIST_FAILED_MESSAGE.to_string(),
            AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!("Unhandled error: {self}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        Envelope::error(message).into_response()
    }
}
