//! Convenience constructors.
//!
//! Category constructors bind a caller-supplied message to a fixed code.
//! Domain constructors are fixed (code, message) pairs. Collaboration codes
//! are reserved and intentionally have none.

use super::app_error::{AppError, BoxError};
use super::code::ErrorCode;

impl AppError {
    // ── general ────────────────────────────────────────────────────────────

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CONFLICT, message)
    }

    /// Wrap an unexpected lower-level failure as an internal error.
    pub fn internal_error(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::wrap(cause, ErrorCode::INTERNAL, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::VALIDATION, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TIMEOUT, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RATE_LIMIT, message)
    }

    // ── authentication ─────────────────────────────────────────────────────

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::INVALID_CREDENTIALS, "Invalid credentials provided")
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TOKEN_EXPIRED, "Token has expired")
    }

    pub fn token_invalid() -> Self {
        Self::new(ErrorCode::TOKEN_INVALID, "Invalid token provided")
    }

    pub fn user_not_found() -> Self {
        Self::new(ErrorCode::USER_NOT_FOUND, "User not found")
    }

    pub fn user_already_exists() -> Self {
        Self::new(ErrorCode::USER_ALREADY_EXISTS, "User already exists")
    }

    // ── document ───────────────────────────────────────────────────────────

    pub fn document_not_found() -> Self {
        Self::new(ErrorCode::DOCUMENT_NOT_FOUND, "Document not found")
    }

    pub fn document_access_denied() -> Self {
        Self::new(ErrorCode::DOCUMENT_ACCESS_DENIED, "Access denied to document")
    }

    pub fn document_locked() -> Self {
        Self::new(ErrorCode::DOCUMENT_LOCKED, "Document is locked for editing")
    }

    pub fn invalid_document_format() -> Self {
        Self::new(ErrorCode::INVALID_DOCUMENT_FORMAT, "Invalid document format")
    }

    pub fn document_size_exceeded() -> Self {
        Self::new(ErrorCode::DOCUMENT_SIZE_EXCEEDED, "Document size limit exceeded")
    }

    // ── workspace ──────────────────────────────────────────────────────────

    pub fn workspace_not_found() -> Self {
        Self::new(ErrorCode::WORKSPACE_NOT_FOUND, "Workspace not found")
    }

    pub fn workspace_access_denied() -> Self {
        Self::new(ErrorCode::WORKSPACE_ACCESS_DENIED, "Access denied to workspace")
    }

    pub fn invitation_expired() -> Self {
        Self::new(ErrorCode::INVITATION_EXPIRED, "Invitation has expired")
    }

    pub fn max_members_exceeded() -> Self {
        Self::new(ErrorCode::MAX_MEMBERS_EXCEEDED, "Workspace member limit reached")
    }
}
