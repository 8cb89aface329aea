//! Ownership rules and changed-file to component resolution.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Set of component names affected by a change.
pub type ComponentSet = BTreeSet<String>;

/// Mapping from component name to the path prefixes it owns.
///
/// Loaded from an external rules document and treated as read-only for the
/// duration of one invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OwnershipRules {
    components: BTreeMap<String, Vec<String>>,
}

impl OwnershipRules {
    /// Build rules from (component, prefixes) pairs.
    pub fn new(components: BTreeMap<String, Vec<String>>) -> Self {
        Self { components }
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no components are registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over (component, prefixes) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.components.iter()
    }

    /// Resolve the set of components affected by the given changed files.
    ///
    /// A component is affected iff at least one changed path starts with at
    /// least one of its registered prefixes. Matching is byte-wise and
    /// case-sensitive, with no path normalization and no longest-prefix-wins:
    /// a single path may match several components and all of them are
    /// included (broad invalidation is the safe direction for CI).
    ///
    /// Empty inputs yield an empty set; this operation cannot fail.
    pub fn resolve(&self, changed: &BTreeSet<String>) -> ComponentSet {
        let mut affected = ComponentSet::new();

        for (component, prefixes) in &self.components {
            for path in changed {
                for prefix in prefixes {
                    if path.starts_with(prefix.as_str()) {
                        affected.insert(component.clone());
                    }
                }
            }
        }

        affected
    }
}
