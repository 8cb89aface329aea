//! Domain-level error taxonomy for tselect.

/// tselect domain errors.
///
/// Input-contract violations are fatal and abort the pipeline; collaborator
/// failures (git, baseline reads) are handled by the callers as degraded
/// defaults and never reach this taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("malformed class id (expected exactly one '::'): {0}")]
    MalformedClassId(String),

    #[error("invalid ownership rules: {0}")]
    InvalidOwnershipRules(String),

    #[error("invalid test catalog: {0}")]
    InvalidCatalog(String),

    #[error("baseline store error: {0}")]
    BaselineStore(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tselect domain operations.
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_class_id_display() {
        let err = SelectError::MalformedClassId("tests/foo.py::A::B".to_string());
        assert!(err.to_string().contains("exactly one '::'"));
        assert!(err.to_string().contains("tests/foo.py::A::B"));
    }

    #[test]
    fn test_invalid_catalog_display() {
        let err = SelectError::InvalidCatalog("missing test_root".to_string());
        assert!(err.to_string().contains("invalid test catalog"));
    }
}
