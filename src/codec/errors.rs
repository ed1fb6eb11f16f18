//! Codec error types
//!
//! Error codes:
//! - LEDGER_CODEC_MALFORMED_TAG
//! - LEDGER_CODEC_UNKNOWN_REFERENCE
//! - LEDGER_CODEC_MALFORMED_FRAME
//! - LEDGER_CODEC_EMPTY_REASON
//! - LEDGER_CODEC_LIMIT_EXCEEDED
//! - LEDGER_CODEC_STREAM
//!
//! Every decode failure aborts the current reason. No partial reason is
//! ever returned and no recovery is attempted. Encoding refuses values the
//! decoder would reject, before writing any byte of them.

use std::io;

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Cause tag outside the known set
    #[error("Malformed cause tag: {tag}")]
    MalformedCauseTag { tag: u8 },

    /// Dictionary index not registered in the current run
    #[error("Unknown dictionary reference: index {index}, {known} texts registered in this run")]
    UnknownDictionaryReference { index: u32, known: usize },

    /// Structurally invalid bytes (flag, varint, UTF-8, limits)
    #[error("Malformed frame: {reason}")]
    MalformedFrame { reason: String },

    /// A reason with zero descriptions was read
    #[error("Decoded selection reason has no descriptions")]
    EmptyReason,

    /// A value to be encoded is larger than the decoder accepts
    #[error("Cannot encode {what}: {actual} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        actual: usize,
        limit: usize,
    },

    /// Underlying stream failure, passed through unchanged
    #[error(transparent)]
    Stream(#[from] io::Error),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::MalformedCauseTag { .. } => "LEDGER_CODEC_MALFORMED_TAG",
            CodecError::UnknownDictionaryReference { .. } => "LEDGER_CODEC_UNKNOWN_REFERENCE",
            CodecError::MalformedFrame { .. } => "LEDGER_CODEC_MALFORMED_FRAME",
            CodecError::EmptyReason => "LEDGER_CODEC_EMPTY_REASON",
            CodecError::LimitExceeded { .. } => "LEDGER_CODEC_LIMIT_EXCEEDED",
            CodecError::Stream(_) => "LEDGER_CODEC_STREAM",
        }
    }

    /// True if the bytes themselves are bad, as opposed to the transport
    /// or a value refused on write
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            CodecError::Stream(_) | CodecError::LimitExceeded { .. }
        )
    }

    /// The underlying I/O error, if this is a stream failure
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            CodecError::Stream(e) => Some(e),
            _ => None,
        }
    }
}
