//! Resolved components and the result they form

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::StoreError;
use crate::selection::SelectionReason;

/// Identifier of a resolved component, `group:module:version`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId {
    group: String,
    module: String,
    version: String,
}

impl ComponentId {
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }

    /// Build an id, rejecting empty segments and segments containing `:`
    pub fn from_parts(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let id = Self::new(group, module, version);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(StoreError::InvalidComponentId(id.to_string()))
        }
    }

    /// True if the id survives a `Display`/`FromStr` round trip
    pub fn is_valid(&self) -> bool {
        [&self.group, &self.module, &self.version]
            .iter()
            .all(|segment| !segment.is_empty() && !segment.contains(':'))
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

impl FromStr for ComponentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(module), Some(version), None) => {
                Self::from_parts(group, module, version)
            }
            _ => Err(StoreError::InvalidComponentId(s.to_string())),
        }
    }
}

impl TryFrom<String> for ComponentId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.to_string()
    }
}

/// One resolved graph node. The node exclusively owns its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    id: ComponentId,
    reason: SelectionReason,
}

impl ResolvedComponent {
    pub fn new(id: ComponentId, reason: SelectionReason) -> Self {
        Self { id, reason }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn reason(&self) -> &SelectionReason {
        &self.reason
    }

    /// The only mutation path for a component's reason
    pub fn reason_mut(&mut self) -> &mut SelectionReason {
        &mut self.reason
    }
}

/// A resolved graph: one reason per component, in resolution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    components: Vec<ResolvedComponent>,
    positions: HashMap<ComponentId, usize>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component, or replace the reason of an existing one.
    ///
    /// Returns the replaced reason. A replaced component keeps its position.
    pub fn insert(&mut self, id: ComponentId, reason: SelectionReason) -> Option<SelectionReason> {
        if let Some(&position) = self.positions.get(&id) {
            return Some(std::mem::replace(&mut self.components[position].reason, reason));
        }
        self.positions.insert(id.clone(), self.components.len());
        self.components.push(ResolvedComponent::new(id, reason));
        None
    }

    pub fn get(&self, id: &ComponentId) -> Option<&SelectionReason> {
        self.positions
            .get(id)
            .map(|&position| &self.components[position].reason)
    }

    pub fn get_mut(&mut self, id: &ComponentId) -> Option<&mut SelectionReason> {
        match self.positions.get(id) {
            Some(&position) => Some(self.components[position].reason_mut()),
            None => None,
        }
    }

    pub fn components(&self) -> &[ResolvedComponent] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components whose selection was not simply what was asked for
    pub fn unexpected(&self) -> impl Iterator<Item = &ResolvedComponent> {
        self.components.iter().filter(|c| !c.reason.is_expected())
    }
}

impl FromIterator<(ComponentId, SelectionReason)> for ResolutionResult {
    fn from_iter<T: IntoIterator<Item = (ComponentId, SelectionReason)>>(iter: T) -> Self {
        let mut result = Self::new();
        for (id, reason) in iter {
            result.insert(id, reason);
        }
        result
    }
}
