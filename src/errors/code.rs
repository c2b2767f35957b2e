//! Stable numeric error codes, grouped into per-domain bands.
//!
//! Each domain owns one thousand-wide band. The values are part of the wire
//! contract with clients and must never be renumbered; a new domain gets a
//! new band.
//!
//! | Band          | Codes       |
//! |---------------|-------------|
//! | general       | 1000 – 1008 |
//! | authentication| 2009 – 2013 |
//! | document      | 3014 – 3018 |
//! | workspace     | 4019 – 4022 |
//! | collaboration | 5023 – 5025 |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain band a code belongs to, derived from its thousands digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeBand {
    General,
    Authentication,
    Document,
    Workspace,
    Collaboration,
}

impl CodeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeBand::General => "general",
            CodeBand::Authentication => "authentication",
            CodeBand::Document => "document",
            CodeBand::Workspace => "workspace",
            CodeBand::Collaboration => "collaboration",
        }
    }
}

impl fmt::Display for CodeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric error code.
///
/// Kept as an open newtype rather than a closed enum so that codes received
/// from other services, or reserved for future domains, stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(u32);

impl ErrorCode {
    // ── general ────────────────────────────────────────────────────────────
    pub const INTERNAL: ErrorCode = ErrorCode(1000);
    pub const BAD_REQUEST: ErrorCode = ErrorCode(1001);
    pub const UNAUTHORIZED: ErrorCode = ErrorCode(1002);
    pub const FORBIDDEN: ErrorCode = ErrorCode(1003);
    pub const NOT_FOUND: ErrorCode = ErrorCode(1004);
    pub const CONFLICT: ErrorCode = ErrorCode(1005);
    pub const VALIDATION: ErrorCode = ErrorCode(1006);
    pub const TIMEOUT: ErrorCode = ErrorCode(1007);
    pub const RATE_LIMIT: ErrorCode = ErrorCode(1008);

    // ── authentication ─────────────────────────────────────────────────────
    pub const INVALID_CREDENTIALS: ErrorCode = ErrorCode(2009);
    pub const TOKEN_EXPIRED: ErrorCode = ErrorCode(2010);
    pub const TOKEN_INVALID: ErrorCode = ErrorCode(2011);
    pub const USER_NOT_FOUND: ErrorCode = ErrorCode(2012);
    pub const USER_ALREADY_EXISTS: ErrorCode = ErrorCode(2013);

    // ── document ───────────────────────────────────────────────────────────
    pub const DOCUMENT_NOT_FOUND: ErrorCode = ErrorCode(3014);
    pub const DOCUMENT_ACCESS_DENIED: ErrorCode = ErrorCode(3015);
    pub const DOCUMENT_LOCKED: ErrorCode = ErrorCode(3016);
    pub const INVALID_DOCUMENT_FORMAT: ErrorCode = ErrorCode(3017);
    pub const DOCUMENT_SIZE_EXCEEDED: ErrorCode = ErrorCode(3018);

    // ── workspace ──────────────────────────────────────────────────────────
    pub const WORKSPACE_NOT_FOUND: ErrorCode = ErrorCode(4019);
    pub const WORKSPACE_ACCESS_DENIED: ErrorCode = ErrorCode(4020);
    pub const INVITATION_EXPIRED: ErrorCode = ErrorCode(4021);
    pub const MAX_MEMBERS_EXCEEDED: ErrorCode = ErrorCode(4022);

    // ── collaboration (reserved, no constructors yet) ──────────────────────
    pub const SESSION_NOT_FOUND: ErrorCode = ErrorCode(5023);
    pub const OPERATION_CONFLICT: ErrorCode = ErrorCode(5024);
    pub const CONCURRENT_EDIT: ErrorCode = ErrorCode(5025);

    /// Every code the taxonomy defines, in numeric order.
    pub const ALL: [ErrorCode; 26] = [
        Self::INTERNAL,
        Self::BAD_REQUEST,
        Self::UNAUTHORIZED,
        Self::FORBIDDEN,
        Self::NOT_FOUND,
        Self::CONFLICT,
        Self::VALIDATION,
        Self::TIMEOUT,
        Self::RATE_LIMIT,
        Self::INVALID_CREDENTIALS,
        Self::TOKEN_EXPIRED,
        Self::TOKEN_INVALID,
        Self::USER_NOT_FOUND,
        Self::USER_ALREADY_EXISTS,
        Self::DOCUMENT_NOT_FOUND,
        Self::DOCUMENT_ACCESS_DENIED,
        Self::DOCUMENT_LOCKED,
        Self::INVALID_DOCUMENT_FORMAT,
        Self::DOCUMENT_SIZE_EXCEEDED,
        Self::WORKSPACE_NOT_FOUND,
        Self::WORKSPACE_ACCESS_DENIED,
        Self::INVITATION_EXPIRED,
        Self::MAX_MEMBERS_EXCEEDED,
        Self::SESSION_NOT_FOUND,
        Self::OPERATION_CONFLICT,
        Self::CONCURRENT_EDIT,
    ];

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Band by thousands digit; `None` for values outside every band.
    pub fn band(&self) -> Option<CodeBand> {
        match self.0 / 1000 {
            1 => Some(CodeBand::General),
            2 => Some(CodeBand::Authentication),
            3 => Some(CodeBand::Document),
            4 => Some(CodeBand::Workspace),
            5 => Some(CodeBand::Collaboration),
            _ => None,
        }
    }

    /// True if the code is one the taxonomy defines.
    pub fn is_known(&self) -> bool {
        self.name().is_some()
    }

    /// Stable symbolic name for known codes.
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::INTERNAL => "INTERNAL",
            Self::BAD_REQUEST => "BAD_REQUEST",
            Self::UNAUTHORIZED => "UNAUTHORIZED",
            Self::FORBIDDEN => "FORBIDDEN",
            Self::NOT_FOUND => "NOT_FOUND",
            Self::CONFLICT => "CONFLICT",
            Self::VALIDATION => "VALIDATION",
            Self::TIMEOUT => "TIMEOUT",
            Self::RATE_LIMIT => "RATE_LIMIT",
            Self::INVALID_CREDENTIALS => "INVALID_CREDENTIALS",
            Self::TOKEN_EXPIRED => "TOKEN_EXPIRED",
            Self::TOKEN_INVALID => "TOKEN_INVALID",
            Self::USER_NOT_FOUND => "USER_NOT_FOUND",
            Self::USER_ALREADY_EXISTS => "USER_ALREADY_EXISTS",
            Self::DOCUMENT_NOT_FOUND => "DOCUMENT_NOT_FOUND",
            Self::DOCUMENT_ACCESS_DENIED => "DOCUMENT_ACCESS_DENIED",
            Self::DOCUMENT_LOCKED => "DOCUMENT_LOCKED",
            Self::INVALID_DOCUMENT_FORMAT => "INVALID_DOCUMENT_FORMAT",
            Self::DOCUMENT_SIZE_EXCEEDED => "DOCUMENT_SIZE_EXCEEDED",
            Self::WORKSPACE_NOT_FOUND => "WORKSPACE_NOT_FOUND",
            Self::WORKSPACE_ACCESS_DENIED => "WORKSPACE_ACCESS_DENIED",
            Self::INVITATION_EXPIRED => "INVITATION_EXPIRED",
            Self::MAX_MEMBERS_EXCEEDED => "MAX_MEMBERS_EXCEEDED",
            Self::SESSION_NOT_FOUND => "SESSION_NOT_FOUND",
            Self::OPERATION_CONFLICT => "OPERATION_CONFLICT",
            Self::CONCURRENT_EDIT => "CONCURRENT_EDIT",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}
