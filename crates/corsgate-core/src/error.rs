//! Shared error type across corsgate crates.

use thiserror::Error;

use crate::policy::allowlist::PatternList;

/// Stable error codes (used in logs and by config tooling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A whitelist pattern did not compile.
    InvalidPattern,
    /// A whitelist was configured with no patterns at all.
    EmptyPatternList,
    /// A method entry is not a valid HTTP token.
    InvalidMethod,
    /// Malformed or out-of-range configuration.
    BadConfig,
    /// Unsupported config file version.
    UnsupportedVersion,
    /// Internal error (I/O, bind failures).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidPattern => "INVALID_PATTERN",
            ErrorCode::EmptyPatternList => "EMPTY_PATTERN_LIST",
            ErrorCode::InvalidMethod => "INVALID_METHOD",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CorsGateError>;

/// Unified error type used by core and gateway.
///
/// Every variant is a startup failure. Per-request policy violations are
/// `Decision` values and never reach this type.
#[derive(Debug, Error)]
pub enum CorsGateError {
    #[error("invalid {list} pattern #{index} `{pattern}`: {source}")]
    InvalidPattern {
        list: PatternList,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("{0} must contain at least one pattern")]
    EmptyPatternList(PatternList),
    #[error("invalid method token: {0:?}")]
    InvalidMethod(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl CorsGateError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CorsGateError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            CorsGateError::EmptyPatternList(_) => ErrorCode::EmptyPatternList,
            CorsGateError::InvalidMethod(_) => ErrorCode::InvalidMethod,
            CorsGateError::BadConfig(_) => ErrorCode::BadConfig,
            CorsGateError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CorsGateError::Internal(_) => ErrorCode::Internal,
        }
    }
}
