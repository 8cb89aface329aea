//! tselect runner - I/O adapters around the core selection logic.
//!
//! Provides:
//! - A streaming pytest executor (tokio subprocess)
//! - Git-based changed-file detection
//! - A filesystem baseline store
//! - Config document loaders
//! - The end-to-end selection pipeline

pub mod baseline_fs;
pub mod config;
pub mod git;
pub mod pipeline;
pub mod pytest;

// Re-export key types
pub use baseline_fs::FsBaselineStore;
pub use config::{load_catalog, load_ownership};
pub use git::changed_files;
pub use pipeline::{record_baseline, SelectionPipeline, SelectionPlan};
pub use pytest::{PytestRunner, TestRunner};
