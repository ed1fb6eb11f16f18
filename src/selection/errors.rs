//! Selection model error types
//!
//! Error codes:
//! - LEDGER_INVALID_ARGUMENT
//! - LEDGER_UNKNOWN_CAUSE

use thiserror::Error;

/// Result type for selection model operations
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Selection model errors
///
/// These are precondition violations by the caller, never data corruption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown selection cause: {0}")]
    UnknownCause(String),
}

impl SelectionError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SelectionError::InvalidArgument(_) => "LEDGER_INVALID_ARGUMENT",
            SelectionError::UnknownCause(_) => "LEDGER_UNKNOWN_CAUSE",
        }
    }
}
