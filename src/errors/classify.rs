//! Telling taxonomy errors apart from opaque ones.
//!
//! Code that owns its error type should return [`ServiceError`] and classify
//! by pattern match. The free functions cover generic handlers that only see
//! a `&dyn Error`.

use std::error::Error as StdError;

use http::StatusCode;
use thiserror::Error;

use super::app_error::{AppError, BoxError};
use super::code::ErrorCode;

/// Error crossing a service boundary: either part of the taxonomy or an
/// opaque failure that nobody translated.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("unexpected error: {0}")]
    Unexpected(BoxError),
}

impl ServiceError {
    /// Treat any foreign error as unexpected.
    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        ServiceError::Unexpected(err.into())
    }

    pub fn as_app_error(&self) -> Option<&AppError> {
        match self {
            ServiceError::App(e) => Some(e),
            ServiceError::Unexpected(_) => None,
        }
    }

    pub fn into_app_error(self) -> Result<AppError, BoxError> {
        match self {
            ServiceError::App(e) => Ok(e),
            ServiceError::Unexpected(e) => Err(e),
        }
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.as_app_error().is_some_and(|e| e.has_code(code))
    }

    /// Unexpected errors are always internal.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ServiceError::App(e) => e.http_status(),
            ServiceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to a taxonomy error, wrapping unexpected failures as internal.
    pub fn into_internal(self) -> AppError {
        match self {
            ServiceError::App(e) => e,
            ServiceError::Unexpected(e) => {
                AppError::wrap(e, ErrorCode::INTERNAL, "Internal server error")
            }
        }
    }
}

/// True if `err` is an [`AppError`], bare or inside a [`ServiceError`].
pub fn is_app_error(err: &(dyn StdError + 'static)) -> bool {
    as_app_error(err).is_some()
}

/// Borrow `err` as an [`AppError`] if it is one. Only the error itself is
/// inspected, not its source chain.
pub fn as_app_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a AppError> {
    if let Some(app) = err.downcast_ref::<AppError>() {
        return Some(app);
    }
    err.downcast_ref::<ServiceError>()
        .and_then(ServiceError::as_app_error)
}

/// True only for taxonomy errors carrying exactly `code`.
pub fn has_code(err: &(dyn StdError + 'static), code: ErrorCode) -> bool {
    as_app_error(err).is_some_and(|e| e.has_code(code))
}

/// Wrap a `Result`'s error into the taxonomy at the boundary where it first
/// becomes meaningful.
pub trait ResultExt<T> {
    fn wrap_err(self, code: ErrorCode, message: impl Into<String>) -> Result<T, AppError>;

    /// Like [`wrap_err`](Self::wrap_err), building the message lazily.
    fn wrap_err_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, AppError>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err(self, code: ErrorCode, message: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::wrap(e, code, message))
    }

    fn wrap_err_with<M, F>(self, code: ErrorCode, message: F) -> Result<T, AppError>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|e| AppError::wrap(e, code, message()))
    }
}
