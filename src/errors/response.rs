//! HTTP translation for handlers built on axum.
//!
//! The body is the public serialization of [`AppError`]. The wrapped cause and
//! the stack trace go to the internal log and never into the response.

use axum::Json;
use axum::response::{IntoResponse, Response};

use super::app_error::AppError;
use super::classify::ServiceError;
use crate::logging;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        logging::log_app_error(&self);
        (self.http_status(), Json(&self)).into_response()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Unexpected(err) = &self {
            tracing::error!(error = %err, "Unexpected error");
        }
        self.into_internal().into_response()
    }
}
