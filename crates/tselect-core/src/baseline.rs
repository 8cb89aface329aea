//! Baseline duration store abstraction.
//!
//! The baseline is a single persisted duration per project checkout. The
//! store is an explicit injected interface rather than module-level state so
//! the pipeline is testable with the in-memory fake below.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The persisted baseline: a reference run duration and when it was recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaselineRecord {
    /// Reference (typically full-suite) run duration in seconds.
    pub duration_seconds: f64,

    /// When the baseline was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl BaselineRecord {
    /// Record a duration observed now.
    pub fn observed_now(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            recorded_at: Utc::now(),
        }
    }
}

/// Keyed-by-checkout baseline storage.
///
/// One store instance corresponds to one project checkout. Lifecycle policy
/// lives with the callers: a `run` bootstraps the baseline once when absent;
/// an explicit `baseline` operation overwrites unconditionally.
///
/// No locking is performed; concurrent invocations against one checkout race
/// on read-modify-write and the last writer wins.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Read the stored baseline, if any. Implementations treat missing or
    /// corrupt records as `Ok(None)` where possible; hard I/O failures are
    /// surfaced for the caller to degrade on.
    async fn get(&self) -> Result<Option<BaselineRecord>>;

    /// Persist the baseline, replacing any prior value.
    async fn set(&self, record: BaselineRecord) -> Result<()>;
}

/// In-memory baseline store for tests.
#[derive(Debug, Default)]
pub struct MemoryBaselineStore {
    record: Mutex<Option<BaselineRecord>>,
}

impl MemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a baseline duration.
    pub fn with_baseline(duration_seconds: f64) -> Self {
        Self {
            record: Mutex::new(Some(BaselineRecord::observed_now(duration_seconds))),
        }
    }
}

#[async_trait]
impl BaselineStore for MemoryBaselineStore {
    async fn get(&self) -> Result<Option<BaselineRecord>> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn set(&self, record: BaselineRecord) -> Result<()> {
        *self.record.lock().unwrap() = Some(record);
        Ok(())
    }
}
