//! Observability for the ledger
//!
//! Structured JSON logging of typed events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on encoding, decoding or persistence
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use selection_ledger::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::StoreLoadComplete, &[("components", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.default_severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.default_severity(), event.as_str(), fields);
}

/// Log an event with fields at an explicit severity
pub fn log_event_at(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // verifies no panic
        log_event(Event::StoreMissing);
        log_event_with_fields(Event::ConfigLoaded, &[("store_path", "/tmp/x.slr")]);
        log_event_at(Severity::Trace, Event::CodecSessionReset, &[]);
    }
}
