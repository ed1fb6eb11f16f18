//! The per-component selection reason
//!
//! A reason keeps two views of the same descriptions:
//!
//! - an insertion-ordered list, whose last entry is the primary description
//! - a membership index, used for duplicate checks and for equality
//!
//! Equality between reasons ignores order. The primary description does not.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cause::SelectionCause;
use super::description::SelectionDescription;
use super::errors::{SelectionError, SelectionResult};

/// Ordered, deduplicated record of every description attached to one
/// component's selection.
///
/// Never empty. The owning graph node is the only mutator; this type does no
/// locking of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<SelectionDescription>",
    into = "Vec<SelectionDescription>"
)]
pub struct SelectionReason {
    /// Descriptions in insertion order
    descriptions: Vec<SelectionDescription>,
    /// Membership index over `descriptions`
    index: HashSet<SelectionDescription>,
}

impl SelectionReason {
    fn single(description: SelectionDescription) -> Self {
        let mut index = HashSet::with_capacity(1);
        index.insert(description.clone());
        Self {
            descriptions: vec![description],
            index,
        }
    }

    /// Reason for a version requested by a dependency declaration
    pub fn requested() -> Self {
        Self::single(SelectionDescription::new(SelectionCause::Requested))
    }

    /// Reason for the root component
    pub fn root() -> Self {
        Self::single(SelectionDescription::new(SelectionCause::Root))
    }

    /// Build a reason from ordered descriptions.
    ///
    /// Keeps the first occurrence of each distinct description at its
    /// original position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `descriptions` is empty.
    pub fn of<I>(descriptions: I) -> SelectionResult<Self>
    where
        I: IntoIterator<Item = SelectionDescription>,
    {
        let iter = descriptions.into_iter();
        let (lower, _) = iter.size_hint();
        let mut reason = Self {
            descriptions: Vec::with_capacity(lower),
            index: HashSet::with_capacity(lower),
        };
        for description in iter {
            reason.push(description);
        }

        if reason.descriptions.is_empty() {
            return Err(SelectionError::InvalidArgument(
                "a selection reason needs at least one description".to_string(),
            ));
        }
        Ok(reason)
    }

    /// Appends unless an equal description is present. Returns whether it was appended.
    fn push(&mut self, description: SelectionDescription) -> bool {
        if self.index.contains(&description) {
            return false;
        }
        self.index.insert(description.clone());
        self.descriptions.push(description);
        true
    }

    /// Append a description built from `cause` and `text`.
    ///
    /// A no-op if an equal description is already present; the existing
    /// entry keeps its position and does not become primary.
    pub fn add_cause(&mut self, cause: SelectionCause, text: impl Into<Arc<str>>) -> &mut Self {
        self.push(SelectionDescription::with_text(cause, text));
        self
    }

    /// Append `description`, with the same dedup rule as [`add_cause`](Self::add_cause).
    pub fn add_description(&mut self, description: SelectionDescription) -> &mut Self {
        self.push(description);
        self
    }

    /// Discard all descriptions and install exactly one.
    pub fn set_cause(&mut self, description: SelectionDescription) -> &mut Self {
        self.descriptions.clear();
        self.index.clear();
        self.push(description);
        self
    }

    /// Descriptions in insertion order
    pub fn descriptions(&self) -> &[SelectionDescription] {
        &self.descriptions
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// The most recently inserted description
    pub fn primary(&self) -> &SelectionDescription {
        self.descriptions
            .last()
            .expect("selection reason is never empty")
    }

    /// Text of the most recently inserted description
    pub fn primary_text(&self) -> &str {
        self.primary().text()
    }

    /// True if any description carries `cause`, wherever it sits
    pub fn has_cause(&self, cause: SelectionCause) -> bool {
        self.descriptions.iter().any(|d| d.cause() == cause)
    }

    pub fn is_forced(&self) -> bool {
        self.has_cause(SelectionCause::Forced)
    }

    pub fn is_conflict_resolution(&self) -> bool {
        self.has_cause(SelectionCause::ConflictResolution)
    }

    pub fn is_selected_by_rule(&self) -> bool {
        self.has_cause(SelectionCause::SelectedByRule)
    }

    pub fn is_composite_substitution(&self) -> bool {
        self.has_cause(SelectionCause::CompositeBuildSubstitution)
    }

    /// True iff the primary description is `Root` or `Requested`.
    ///
    /// Earlier entries are ignored.
    pub fn is_expected(&self) -> bool {
        self.primary().cause().is_expected()
    }

    /// True if any description has non-default text
    pub fn has_custom_descriptions(&self) -> bool {
        self.descriptions.iter().any(SelectionDescription::is_custom)
    }
}

impl PartialEq for SelectionReason {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for SelectionReason {}

impl Hash for SelectionReason {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&SelectionDescription> = self.descriptions.iter().collect();
        sorted.sort_unstable();
        sorted.len().hash(state);
        for description in sorted {
            description.hash(state);
        }
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary_text())
    }
}

impl TryFrom<Vec<SelectionDescription>> for SelectionReason {
    type Error = SelectionError;

    fn try_from(descriptions: Vec<SelectionDescription>) -> Result<Self, Self::Error> {
        Self::of(descriptions)
    }
}

impl From<SelectionReason> for Vec<SelectionDescription> {
    fn from(reason: SelectionReason) -> Self {
        reason.descriptions
    }
}
