//! Filesystem baseline store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::warn;

use tselect_core::error::{Result, SelectError};
use tselect_core::{BaselineRecord, BaselineStore};

/// Baseline store backed by `.tselect/baseline.json` under the repo root.
///
/// One file per project checkout. Writes are atomic (temp file + rename in
/// the same directory); reads degrade to "no baseline" on missing or corrupt
/// records. No locking: concurrent invocations race and the last writer
/// wins.
pub struct FsBaselineStore {
    path: PathBuf,
}

impl FsBaselineStore {
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        Self {
            path: repo_root.as_ref().join(".tselect").join("baseline.json"),
        }
    }

    /// Location of the record on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BaselineStore for FsBaselineStore {
    async fn get(&self) -> Result<Option<BaselineRecord>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SelectError::Io(e)),
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt baseline record, treating as absent");
                Ok(None)
            }
        }
    }

    async fn set(&self, record: BaselineRecord) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| SelectError::BaselineStore("baseline path has no parent".to_string()))?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(&record)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
