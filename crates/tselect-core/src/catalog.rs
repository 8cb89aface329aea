//! Test catalog types and component to test-class expansion.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::ownership::ComponentSet;

/// De-duplicated set of selected test classes.
pub type SelectedClasses = BTreeSet<QualifiedClassId>;

/// Per-class test counts, keyed by qualified class id.
pub type ClassTestCounts = BTreeMap<QualifiedClassId, usize>;

/// Unique identifier for a selectable test class.
///
/// Format: `{test_root}/{test_file}::{class_name}`. The id must contain
/// exactly one `::` separator so it can be split back into its file and
/// class parts for command building; [`QualifiedClassId::split`] enforces
/// that contract and malformed ids are a fatal input violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedClassId(String);

impl QualifiedClassId {
    /// Build an id from catalog coordinates.
    pub fn from_parts(test_root: &str, test_file: &str, class_name: &str) -> Self {
        QualifiedClassId(format!("{test_root}/{test_file}::{class_name}"))
    }

    /// The full id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (file target, class name).
    ///
    /// Fails unless the id contains exactly one `::` separator.
    pub fn split(&self) -> Result<(&str, &str)> {
        let mut parts = self.0.split("::");
        match (parts.next(), parts.next(), parts.next()) {
            (Some(file), Some(class), None) if !file.is_empty() && !class.is_empty() => {
                Ok((file, class))
            }
            _ => Err(SelectError::MalformedClassId(self.0.clone())),
        }
    }
}

impl From<String> for QualifiedClassId {
    fn from(s: String) -> Self {
        QualifiedClassId(s)
    }
}

impl std::fmt::Display for QualifiedClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One class entry in the catalog: a mapping of test name to test metadata.
///
/// Only the number of entries is consumed (per-class test count); the
/// metadata values themselves are opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassEntry {
    #[serde(default)]
    pub tests: BTreeMap<String, serde_json::Value>,
}

/// Structured inventory of test files, classes, and tests per component.
///
/// Loaded from an external catalog document and treated as read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestCatalog {
    /// Path prefix under which all test files in the catalog live.
    #[serde(default)]
    pub test_root: String,

    /// component -> test file -> class name -> class entry
    #[serde(default)]
    pub components: BTreeMap<String, BTreeMap<String, BTreeMap<String, ClassEntry>>>,
}

impl TestCatalog {
    /// Expand affected components into selected test classes and counts.
    ///
    /// Components absent from the catalog are silently skipped. The result
    /// set de-duplicates by class id; when the same id is reached more than
    /// once its count is the last value written (a single catalog document
    /// cannot hold divergent counts for one `(file, class)` pair).
    ///
    /// An empty result is a valid outcome and signals "fall back to the full
    /// suite" to the caller.
    pub fn expand(&self, components: &ComponentSet) -> (SelectedClasses, ClassTestCounts) {
        let mut selected = SelectedClasses::new();
        let mut counts = ClassTestCounts::new();

        for component in components {
            let Some(files) = self.components.get(component) else {
                continue;
            };

            for (test_file, classes) in files {
                for (class_name, entry) in classes {
                    let id = QualifiedClassId::from_parts(&self.test_root, test_file, class_name);
                    counts.insert(id.clone(), entry.tests.len());
                    selected.insert(id);
                }
            }
        }

        (selected, counts)
    }
}
