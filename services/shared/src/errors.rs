/// Shared error types for the coin flip crates
///
/// Design:
/// - Standardized error codes so log lines and exit codes agree across crates
/// - Categorized by domain (Validation, Backend, Cancelled, Internal)
/// - `InputError` is always recoverable at the prompt, `BackendError` never
///   turns into a fabricated outcome
///
/// Error codes follow the pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error categories that map to process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// User typed something the prompt cannot use; re-prompt
    Validation,

    /// Measurement backend unreachable, misconfigured or returned garbage
    Backend,

    /// User interrupted the session
    Cancelled,

    /// Anything else
    Internal,
}

impl ErrorCategory {
    /// Map error category to a process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCategory::Validation => 0,
            ErrorCategory::Cancelled => 0,
            ErrorCategory::Backend => 1,
            ErrorCategory::Internal => 1,
        }
    }
}

/// Standard error codes used across all crates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_GUESS: ErrorCode = ErrorCode("VALIDATION_INVALID_GUESS");
    pub const VALIDATION_INVALID_ROUND_COUNT: ErrorCode =
        ErrorCode("VALIDATION_INVALID_ROUND_COUNT");

    // Backend errors
    pub const BACKEND_UNREACHABLE: ErrorCode = ErrorCode("BACKEND_UNREACHABLE");
    pub const BACKEND_MISCONFIGURED: ErrorCode = ErrorCode("BACKEND_MISCONFIGURED");
    pub const BACKEND_EMPTY_RESULT: ErrorCode = ErrorCode("BACKEND_EMPTY_RESULT");
    pub const BACKEND_AMBIGUOUS_RESULT: ErrorCode = ErrorCode("BACKEND_AMBIGUOUS_RESULT");
    pub const BACKEND_INVALID_OUTCOME: ErrorCode = ErrorCode("BACKEND_INVALID_OUTCOME");
    pub const BACKEND_MALFORMED_RESPONSE: ErrorCode = ErrorCode("BACKEND_MALFORMED_RESPONSE");
    pub const BACKEND_HTTP_STATUS: ErrorCode = ErrorCode("BACKEND_HTTP_STATUS");
    pub const BACKEND_CIRCUIT_OPEN: ErrorCode = ErrorCode("BACKEND_CIRCUIT_OPEN");
    pub const BACKEND_RETRIES_EXHAUSTED: ErrorCode = ErrorCode("BACKEND_RETRIES_EXHAUSTED");

    // Internal errors
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input the prompt cannot use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid guess {0:?}: please enter 0, 1, or 'exit'")]
    InvalidGuess(String),

    #[error("Invalid round count {0:?}: please enter a positive integer or 'exit'")]
    InvalidRoundCount(String),
}

impl InputError {
    pub fn code(&self) -> ErrorCode {
        match self {
            InputError::InvalidGuess(_) => ErrorCode::VALIDATION_INVALID_GUESS,
            InputError::InvalidRoundCount(_) => ErrorCode::VALIDATION_INVALID_ROUND_COUNT,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Failure of a measurement backend to produce exactly one outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Measurement backend unreachable at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Measurement backend misconfigured: {0}")]
    Misconfigured(String),

    #[error("Measurement backend returned no outcome")]
    EmptyResult,

    #[error("Measurement backend returned {outcomes} distinct outcomes for a single shot")]
    AmbiguousResult { outcomes: usize },

    #[error("Measurement backend reported {actual} shots, expected {expected}")]
    UnexpectedShots { expected: u32, actual: u32 },

    #[error("Measurement backend returned a non-binary outcome: {0:?}")]
    InvalidOutcome(String),

    #[error("Measurement backend sent a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Measurement backend responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Measurement backend circuit breaker is open")]
    CircuitOpen,

    #[error("Measurement backend failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Measurement backend internal error: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BackendError::Unreachable { .. } => ErrorCode::BACKEND_UNREACHABLE,
            BackendError::Misconfigured(_) => ErrorCode::BACKEND_MISCONFIGURED,
            BackendError::EmptyResult => ErrorCode::BACKEND_EMPTY_RESULT,
            BackendError::AmbiguousResult { .. } => ErrorCode::BACKEND_AMBIGUOUS_RESULT,
            BackendError::UnexpectedShots { .. } => ErrorCode::BACKEND_AMBIGUOUS_RESULT,
            BackendError::InvalidOutcome(_) => ErrorCode::BACKEND_INVALID_OUTCOME,
            BackendError::MalformedResponse(_) => ErrorCode::BACKEND_MALFORMED_RESPONSE,
            BackendError::Status { .. } => ErrorCode::BACKEND_HTTP_STATUS,
            BackendError::CircuitOpen => ErrorCode::BACKEND_CIRCUIT_OPEN,
            BackendError::RetriesExhausted { .. } => ErrorCode::BACKEND_RETRIES_EXHAUSTED,
            BackendError::Internal(_) => ErrorCode::INTERNAL_UNEXPECTED,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BackendError::Internal(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Backend,
        }
    }

    /// Whether retrying the same request might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Unreachable { .. } => true,
            BackendError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
