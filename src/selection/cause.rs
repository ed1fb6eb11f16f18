//! Selection cause categories
//!
//! The set of causes is closed and append-only. Every variant owns a wire tag
//! that is assigned once and never reused, so persisted results stay readable
//! when variants are added or the enum is reordered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::SelectionError;

/// Why a component version was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionCause {
    /// The component is the root of the graph
    Root,
    /// The version was requested by a dependency declaration
    Requested,
    /// The version was force-pinned
    Forced,
    /// The version won conflict resolution
    ConflictResolution,
    /// The version was substituted by a selection rule
    SelectedByRule,
    /// The component was substituted by a composite-build participant
    CompositeBuildSubstitution,
}

impl SelectionCause {
    /// All causes, in wire tag order
    pub const ALL: [SelectionCause; 6] = [
        SelectionCause::Root,
        SelectionCause::Requested,
        SelectionCause::Forced,
        SelectionCause::ConflictResolution,
        SelectionCause::SelectedByRule,
        SelectionCause::CompositeBuildSubstitution,
    ];

    /// Stable wire tag. Never reassign or reuse a value.
    pub fn wire_tag(self) -> u8 {
        match self {
            SelectionCause::Root => 0,
            SelectionCause::Requested => 1,
            SelectionCause::Forced => 2,
            SelectionCause::ConflictResolution => 3,
            SelectionCause::SelectedByRule => 4,
            SelectionCause::CompositeBuildSubstitution => 5,
        }
    }

    /// Convert from a wire tag, returns None for unknown values
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SelectionCause::Root),
            1 => Some(SelectionCause::Requested),
            2 => Some(SelectionCause::Forced),
            3 => Some(SelectionCause::ConflictResolution),
            4 => Some(SelectionCause::SelectedByRule),
            5 => Some(SelectionCause::CompositeBuildSubstitution),
            _ => None,
        }
    }

    /// Built-in description text used when no custom text is given
    pub fn default_text(self) -> &'static str {
        match self {
            SelectionCause::Root => "root",
            SelectionCause::Requested => "requested",
            SelectionCause::Forced => "forced",
            SelectionCause::ConflictResolution => "conflict resolution",
            SelectionCause::SelectedByRule => "selected by rule",
            SelectionCause::CompositeBuildSubstitution => "composite build substitution",
        }
    }

    /// Returns the external name (`ROOT`, `REQUESTED`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionCause::Root => "ROOT",
            SelectionCause::Requested => "REQUESTED",
            SelectionCause::Forced => "FORCED",
            SelectionCause::ConflictResolution => "CONFLICT_RESOLUTION",
            SelectionCause::SelectedByRule => "SELECTED_BY_RULE",
            SelectionCause::CompositeBuildSubstitution => "COMPOSITE_BUILD_SUBSTITUTION",
        }
    }

    /// Returns true for causes that mean the version is the one asked for
    pub fn is_expected(self) -> bool {
        matches!(self, SelectionCause::Root | SelectionCause::Requested)
    }
}

impl fmt::Display for SelectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SelectionCause {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectionCause::ALL
            .iter()
            .copied()
            .find(|cause| cause.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SelectionError::UnknownCause(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags_are_fixed() {
        assert_eq!(SelectionCause::Root.wire_tag(), 0);
        assert_eq!(SelectionCause::Requested.wire_tag(), 1);
        assert_eq!(SelectionCause::Forced.wire_tag(), 2);
        assert_eq!(SelectionCause::ConflictResolution.wire_tag(), 3);
        assert_eq!(SelectionCause::SelectedByRule.wire_tag(), 4);
        assert_eq!(SelectionCause::CompositeBuildSubstitution.wire_tag(), 5);
    }

    #[test]
    fn test_wire_tag_conversion() {
        for cause in SelectionCause::ALL {
            assert_eq!(SelectionCause::from_wire_tag(cause.wire_tag()), Some(cause));
        }
        assert_eq!(SelectionCause::from_wire_tag(6), None);
        assert_eq!(SelectionCause::from_wire_tag(255), None);
    }

    #[test]
    fn test_only_root_and_requested_are_expected() {
        let expected: Vec<_> = SelectionCause::ALL
            .iter()
            .filter(|c| c.is_expected())
            .collect();
        assert_eq!(expected, vec![&SelectionCause::Root, &SelectionCause::Requested]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("FORCED".parse::<SelectionCause>().unwrap(), SelectionCause::Forced);
        assert_eq!(
            "conflict_resolution".parse::<SelectionCause>().unwrap(),
            SelectionCause::ConflictResolution
        );
        assert!("pinned".parse::<SelectionCause>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SelectionCause::SelectedByRule).unwrap();
        assert_eq!(json, "\"SELECTED_BY_RULE\"");
        let cause: SelectionCause = serde_json::from_str("\"COMPOSITE_BUILD_SUBSTITUTION\"").unwrap();
        assert_eq!(cause, SelectionCause::CompositeBuildSubstitution);
    }
}
