//! The structured application error.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::code::ErrorCode;
use super::stack;

/// Boxed lower-level cause carried by a wrapped [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Diagnostic key/value pairs attached to an error.
pub type ErrorContext = BTreeMap<String, Value>;

/// A taxonomy error: stable code, human message, optional details, optional
/// wrapped cause, optional structured context and the call stack at the
/// construction site.
///
/// Built once where a failure is recognised, enriched by value with
/// [`with_context`](Self::with_context) / [`with_details`](Self::with_details),
/// then handed up the stack. The serialized form is the client-facing body;
/// the cause and the stack trace are internal and never serialized.
#[derive(Serialize)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip)]
    internal: Option<BoxError>,
    #[serde(skip)]
    stack_trace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<ErrorContext>,
}

impl AppError {
    /// Create an error with no cause. The stack is captured here.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            internal: None,
            stack_trace: stack::capture(),
            context: None,
        }
    }

    /// Wrap a lower-level failure. The stack records where the translation
    /// happened, not where `cause` originated.
    pub fn wrap(cause: impl Into<BoxError>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            internal: Some(cause.into()),
            stack_trace: stack::capture(),
            context: None,
        }
    }

    /// Add or overwrite one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the supplementary explanation, replacing any previous one.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// The wrapped cause. Internal diagnostics only.
    pub fn internal(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.internal.as_deref()
    }

    /// Filtered stack captured at construction. Internal diagnostics only.
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }

    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.as_ref().and_then(|c| c.get(key))
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    /// Transport status for this error's code.
    pub fn http_status(&self) -> StatusCode {
        status_for(self.code)
    }
}

/// Map a code to its HTTP status. Total: codes outside the table are 500.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BAD_REQUEST
        | ErrorCode::VALIDATION
        | ErrorCode::INVALID_DOCUMENT_FORMAT
        | ErrorCode::DOCUMENT_SIZE_EXCEEDED => StatusCode::BAD_REQUEST,

        ErrorCode::UNAUTHORIZED
        | ErrorCode::INVALID_CREDENTIALS
        | ErrorCode::TOKEN_EXPIRED
        | ErrorCode::TOKEN_INVALID => StatusCode::UNAUTHORIZED,

        ErrorCode::FORBIDDEN
        | ErrorCode::DOCUMENT_ACCESS_DENIED
        | ErrorCode::WORKSPACE_ACCESS_DENIED => StatusCode::FORBIDDEN,

        ErrorCode::NOT_FOUND
        | ErrorCode::USER_NOT_FOUND
        | ErrorCode::DOCUMENT_NOT_FOUND
        | ErrorCode::WORKSPACE_NOT_FOUND
        | ErrorCode::SESSION_NOT_FOUND => StatusCode::NOT_FOUND,

        ErrorCode::CONFLICT
        | ErrorCode::USER_ALREADY_EXISTS
        | ErrorCode::DOCUMENT_LOCKED
        | ErrorCode::OPERATION_CONFLICT
        | ErrorCode::CONCURRENT_EDIT => StatusCode::CONFLICT,

        ErrorCode::TIMEOUT => StatusCode::REQUEST_TIMEOUT,
        ErrorCode::RATE_LIMIT => StatusCode::TOO_MANY_REQUESTS,

        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.internal {
            Some(cause) => write!(f, "[{}] {}: {}", self.code, self.message, cause),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("details", &self.details)
            .field("internal", &self.internal)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.internal
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
