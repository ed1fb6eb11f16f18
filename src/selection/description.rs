//! A selection cause paired with explanatory text

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cause::SelectionCause;

/// Immutable `(cause, text)` pair.
///
/// Equality and hashing are by both fields. The text is shared so that a
/// decoded result can hand the same allocation to every reason that
/// references it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionDescription {
    cause: SelectionCause,
    text: Arc<str>,
}

impl SelectionDescription {
    /// Create a description carrying the cause's built-in text
    pub fn new(cause: SelectionCause) -> Self {
        Self {
            cause,
            text: Arc::from(cause.default_text()),
        }
    }

    /// Create a description with explicit text
    pub fn with_text(cause: SelectionCause, text: impl Into<Arc<str>>) -> Self {
        Self {
            cause,
            text: text.into(),
        }
    }

    pub fn cause(&self) -> SelectionCause {
        self.cause
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the text
    pub fn shared_text(&self) -> &Arc<str> {
        &self.text
    }

    /// True when the text differs from the cause's built-in text
    pub fn is_custom(&self) -> bool {
        &*self.text != self.cause.default_text()
    }
}

impl From<SelectionCause> for SelectionDescription {
    fn from(cause: SelectionCause) -> Self {
        Self::new(cause)
    }
}

impl fmt::Display for SelectionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_text_is_not_custom() {
        let desc = SelectionDescription::new(SelectionCause::Forced);
        assert_eq!(desc.text(), "forced");
        assert!(!desc.is_custom());
    }

    #[test]
    fn test_explicit_default_text_is_not_custom() {
        let desc = SelectionDescription::with_text(SelectionCause::Requested, "requested");
        assert!(!desc.is_custom());
        assert_eq!(desc, SelectionDescription::new(SelectionCause::Requested));
    }

    #[test]
    fn test_custom_text() {
        let desc = SelectionDescription::with_text(SelectionCause::Forced, "forced to 1.2");
        assert!(desc.is_custom());
        assert_eq!(desc.to_string(), "forced to 1.2");
    }

    #[test]
    fn test_equality_uses_cause_and_text() {
        let a = SelectionDescription::with_text(SelectionCause::Forced, "x");
        let b = SelectionDescription::with_text(SelectionCause::SelectedByRule, "x");
        let c = SelectionDescription::with_text(SelectionCause::Forced, String::from("x"));
        assert_ne!(a, b);
        assert_eq!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_text_of_another_cause_is_custom() {
        let desc = SelectionDescription::with_text(SelectionCause::Root, "requested");
        assert!(desc.is_custom());
    }
}
