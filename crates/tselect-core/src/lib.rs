//! tselect core - change-impact test selection domain logic.
//!
//! Provides the selection pipeline's pure stages:
//! - Map changed files to owning components (ownership rules)
//! - Expand components to concrete test classes (test catalog)
//! - Build a filtered test-runner invocation
//! - Parse runner output into an outcome and report against a baseline

pub mod baseline;
pub mod catalog;
pub mod error;
pub mod invocation;
pub mod outcome;
pub mod ownership;
pub mod summary;
pub mod telemetry;

// Re-export key types
pub use baseline::{BaselineRecord, BaselineStore, MemoryBaselineStore};
pub use catalog::{ClassTestCounts, QualifiedClassId, SelectedClasses, TestCatalog};
pub use error::{Result, SelectError};
pub use invocation::Invocation;
pub use outcome::RunOutcome;
pub use ownership::{ComponentSet, OwnershipRules};
pub use summary::{RunStatus, RunSummary};
pub use telemetry::init_tracing;
