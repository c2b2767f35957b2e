//! Application error taxonomy.
//!
//! # Module layout
//!
//! - **code** — `ErrorCode` and the per-domain code bands.
//! - **app_error** — `AppError`: enrichment, HTTP status, rendering.
//! - **constructors** — category and domain shorthands on `AppError`.
//! - **classify** — `ServiceError`, `is_app_error` / `as_app_error` /
//!   `has_code`, and `ResultExt::wrap_err`.
//! - **stack** — filtered call-stack capture.
//! - **response** — axum `IntoResponse` (feature `axum`).
//!
//! Failures are wrapped once, where they are first recognised as
//! domain-significant. Outer boundaries classify, log the context and
//! details, and answer with the status and public body; the cause and the
//! stack trace stay in internal logs.

mod app_error;
mod classify;
mod code;
mod constructors;
#[cfg(feature = "axum")]
mod response;
mod stack;

pub use app_error::{AppError, BoxError, ErrorContext, status_for};
pub use classify::{ResultExt, ServiceError, as_app_error, has_code, is_app_error};
pub use code::{CodeBand, ErrorCode};
pub use stack::{StackFilter, install_stack_filter, stack_filter};

/// Result alias for operations that fail with a boundary error.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
