//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Codec
    /// Codec dictionary cleared (direction switch or explicit reset)
    CodecSessionReset,

    // Result store
    /// Resolution result written and renamed into place
    StoreWriteComplete,
    /// Resolution result read and verified
    StoreLoadComplete,
    /// No cached resolution result on disk
    StoreMissing,
    /// Cached resolution result failed verification or decoding
    StoreCorrupted,
    /// Corrupted cache file removed so resolution is recomputed
    StoreInvalidated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CodecSessionReset => "CODEC_SESSION_RESET",
            Event::StoreWriteComplete => "STORE_WRITE_COMPLETE",
            Event::StoreLoadComplete => "STORE_LOAD_COMPLETE",
            Event::StoreMissing => "STORE_MISSING",
            Event::StoreCorrupted => "STORE_CORRUPTED",
            Event::StoreInvalidated => "STORE_INVALIDATED",
        }
    }

    /// Severity used when no explicit one is given
    pub fn default_severity(&self) -> Severity {
        match self {
            Event::CodecSessionReset => Severity::Trace,
            Event::StoreCorrupted | Event::StoreInvalidated => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::CodecSessionReset.as_str(), "CODEC_SESSION_RESET");
        assert_eq!(Event::StoreCorrupted.to_string(), "STORE_CORRUPTED");
    }

    #[test]
    fn test_corruption_is_warning() {
        assert_eq!(Event::StoreCorrupted.default_severity(), Severity::Warn);
        assert_eq!(Event::StoreLoadComplete.default_severity(), Severity::Info);
        assert_eq!(Event::CodecSessionReset.default_severity(), Severity::Trace);
    }
}
