//! Result store error types
//!
//! Error codes:
//! - LEDGER_STORE_IO
//! - LEDGER_STORE_CORRUPTED
//! - LEDGER_STORE_UNSUPPORTED_VERSION
//! - LEDGER_STORE_CODEC
//! - LEDGER_STORE_INVALID_COMPONENT_ID
//!
//! Corruption of a cached result is never repaired. Callers discard the file
//! and recompute resolution.

use std::io;

use thiserror::Error;

use crate::codec::CodecError;

/// Result type for result store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Corrupted result file: {reason}")]
    Corrupted { reason: String },

    #[error("Unsupported result format version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("Codec failure at component #{component}: {source}")]
    Codec {
        component: usize,
        #[source]
        source: CodecError,
    },

    #[error("Invalid component id '{0}', expected group:module:version")]
    InvalidComponentId(String),
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn corrupted(reason: impl Into<String>) -> Self {
        StoreError::Corrupted {
            reason: reason.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "LEDGER_STORE_IO",
            StoreError::Corrupted { .. } => "LEDGER_STORE_CORRUPTED",
            StoreError::UnsupportedVersion { .. } => "LEDGER_STORE_UNSUPPORTED_VERSION",
            StoreError::Codec { .. } => "LEDGER_STORE_CODEC",
            StoreError::InvalidComponentId(_) => "LEDGER_STORE_INVALID_COMPONENT_ID",
        }
    }

    /// True if the file contents cannot be trusted.
    ///
    /// A codec failure while reading is corruption: the bytes were already
    /// checksum-verified and held in memory. A limit refused while writing
    /// is not.
    pub fn is_corruption(&self) -> bool {
        match self {
            StoreError::Corrupted { .. } | StoreError::UnsupportedVersion { .. } => true,
            StoreError::Codec { source, .. } => {
                !matches!(source, CodecError::LimitExceeded { .. })
            }
            StoreError::Io { .. } | StoreError::InvalidComponentId(_) => false,
        }
    }
}
