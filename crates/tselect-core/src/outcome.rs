//! Run outcome model and runner-output parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Result of one test-runner execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunOutcome {
    /// Process return code (authoritative pass/fail signal).
    pub return_code: i32,

    /// Tests reported passed.
    pub passed: u64,

    /// Tests reported failed.
    pub failed: u64,

    /// Tests reported skipped.
    pub skipped: u64,

    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

impl RunOutcome {
    /// Build an outcome from the runner's return code, accumulated output,
    /// and measured duration.
    pub fn from_output(return_code: i32, output: &str, duration_seconds: f64) -> Self {
        let (passed, failed, skipped) = parse_counts(output);
        Self {
            return_code,
            passed,
            failed,
            skipped,
            duration_seconds,
        }
    }
}

/// Extract (passed, failed, skipped) counts from runner output.
///
/// Each metric is matched independently (`N passed`, `N failed`,
/// `N skipped`), so the summary line may list the counts in any order and
/// omit any subset; absent metrics default to zero. Output with no
/// recognizable counts at all parses as (0, 0, 0) rather than failing —
/// the process return code remains the authoritative signal.
pub fn parse_counts(output: &str) -> (u64, u64, u64) {
    (
        extract_count(output, "passed"),
        extract_count(output, "failed"),
        extract_count(output, "skipped"),
    )
}

fn extract_count(output: &str, metric: &str) -> u64 {
    let pattern = format!(r"(\d+)\s+{metric}");
    let Ok(re) = Regex::new(&pattern) else {
        return 0;
    };
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
