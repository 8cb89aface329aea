//! Loaders for the ownership-rules and test-catalog documents.
//!
//! Malformed documents are input-contract violations: the pipeline aborts
//! with a clear message rather than proceeding with partial configuration.

use std::fs;
use std::path::Path;

use tselect_core::error::{Result, SelectError};
use tselect_core::{OwnershipRules, TestCatalog};

/// Load the component → path-prefix ownership rules from a JSON document.
pub fn load_ownership(path: &Path) -> Result<OwnershipRules> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        SelectError::InvalidOwnershipRules(format!("{}: {e}", path.display()))
    })
}

/// Load the test catalog (`test_root` + component → file → class → tests)
/// from a JSON document.
pub fn load_catalog(path: &Path) -> Result<TestCatalog> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| SelectError::InvalidCatalog(format!("{}: {e}", path.display())))
}
