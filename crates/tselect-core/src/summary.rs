//! Run summary reporting: status classification, savings, rendering.

use serde::{Deserialize, Serialize};

use crate::outcome::RunOutcome;
use crate::ownership::ComponentSet;

/// Three-way run status, classified from pass/fail counts.
///
/// The process return code is deliberately not consulted here; counts give
/// the richer classification (a run with both passes and failures is a
/// partial failure, not just "failed").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Passed,
    Failed,
    PartialFail,
}

impl RunStatus {
    /// Classify from counts, in priority order: mixed results are a partial
    /// failure; any failure without passes is a failure; everything else
    /// (including skip-only runs) passes.
    pub fn classify(passed: u64, failed: u64) -> Self {
        if failed > 0 && passed > 0 {
            RunStatus::PartialFail
        } else if failed > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        }
    }

    /// Icon-prefixed display label.
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Passed => "✔ PASSED",
            RunStatus::Failed => "✖ FAILED",
            RunStatus::PartialFail => "⚠ PARTIAL_FAIL",
        }
    }
}

/// Derived, ephemeral run report. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub components: ComponentSet,
    pub total_tests: usize,
    pub outcome: RunOutcome,

    /// Stored baseline duration, when one exists.
    pub baseline_seconds: Option<f64>,

    /// `max(0, baseline - duration)`; zero when no baseline exists. Clamping
    /// never hides a slower-than-baseline run: the raw duration is always
    /// reported alongside the baseline.
    pub time_saved_seconds: f64,

    /// Percentage of the baseline saved; absent when no usable baseline.
    pub percent_saved: Option<f64>,
}

impl RunSummary {
    /// Combine the run outcome with the component set, test counts, and the
    /// stored baseline into a report.
    pub fn new(
        components: ComponentSet,
        total_tests: usize,
        outcome: RunOutcome,
        baseline_seconds: Option<f64>,
    ) -> Self {
        let status = RunStatus::classify(outcome.passed, outcome.failed);

        let time_saved_seconds = baseline_seconds
            .map(|baseline| (baseline - outcome.duration_seconds).max(0.0))
            .unwrap_or(0.0);

        let percent_saved = match baseline_seconds {
            Some(baseline) if baseline > 0.0 => Some(time_saved_seconds / baseline * 100.0),
            _ => None,
        };

        Self {
            status,
            components,
            total_tests,
            outcome,
            baseline_seconds,
            time_saved_seconds,
            percent_saved,
        }
    }

    /// Render the CI-style text report.
    pub fn render_text(&self) -> String {
        let heavy = "=".repeat(70);
        let light = "-".repeat(70);

        let comp_str = if self.components.is_empty() {
            "None".to_string()
        } else {
            self.components
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = String::new();
        out.push_str(&format!("\n{heavy}\n"));
        out.push_str(" Automated Test Impact Analysis (tselect)\n");
        out.push_str(&format!("{heavy}\n\n"));

        out.push_str(&format!("Status            : {}\n", self.status.label()));
        out.push_str(&format!("Components        : {comp_str}\n"));
        out.push_str(&format!("Tests Executed    : {}\n", self.total_tests));

        out.push_str(&format!("\n{light}\n Test Results\n{light}\n"));
        out.push_str(&format!("  Passed  : {}\n", self.outcome.passed));
        out.push_str(&format!("  Failed  : {}\n", self.outcome.failed));
        out.push_str(&format!("  Skipped : {}\n", self.outcome.skipped));

        out.push_str(&format!("\n{light}\n Execution Metrics\n{light}\n"));
        out.push_str(&format!(
            "  Execution Time : {:.2}s\n",
            self.outcome.duration_seconds
        ));
        match self.baseline_seconds {
            Some(baseline) => {
                out.push_str(&format!("  Baseline Time  : {baseline:.2}s\n"));
            }
            None => out.push_str("  Baseline Time  : N/A\n"),
        }
        match self.percent_saved {
            Some(percent) => out.push_str(&format!(
                "  Time Saved     : {:.2}s ({percent:.1}% faster)\n",
                self.time_saved_seconds
            )),
            None => out.push_str("  Time Saved     : N/A\n"),
        }

        out.push_str(&format!("\n{light}\n Impact Summary\n{light}\n"));
        for component in &self.components {
            out.push_str(&format!("  - {component}\n"));
        }

        out.push_str(&format!("\n{heavy}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(passed: u64, failed: u64, skipped: u64, duration: f64) -> RunOutcome {
        RunOutcome {
            return_code: if failed > 0 { 1 } else { 0 },
            passed,
            failed,
            skipped,
            duration_seconds: duration,
        }
    }

    fn components(names: &[&str]) -> ComponentSet {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_classify_all_passed() {
        assert_eq!(RunStatus::classify(10, 0), RunStatus::Passed);
    }

    #[test]
    fn test_classify_skips_only_is_passed() {
        let summary = RunSummary::new(ComponentSet::new(), 5, outcome(0, 0, 5, 1.0), None);
        assert_eq!(summary.status, RunStatus::Passed);
    }

    #[test]
    fn test_classify_partial_fail() {
        assert_eq!(RunStatus::classify(3, 2), RunStatus::PartialFail);
    }

    #[test]
    fn test_classify_failed() {
        assert_eq!(RunStatus::classify(0, 2), RunStatus::Failed);
    }

    #[test]
    fn test_savings_against_baseline() {
        let summary = RunSummary::new(
            components(&["inductor"]),
            4,
            outcome(4, 0, 0, 7.5),
            Some(10.0),
        );
        assert!((summary.time_saved_seconds - 2.5).abs() < 1e-9);
        assert!((summary.percent_saved.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_slower_than_baseline_clamps_but_reports_raw_duration() {
        let summary = RunSummary::new(
            components(&["inductor"]),
            4,
            outcome(4, 0, 0, 12.0),
            Some(10.0),
        );
        assert_eq!(summary.time_saved_seconds, 0.0);
        assert_eq!(summary.percent_saved, Some(0.0));

        let text = summary.render_text();
        assert!(text.contains("Execution Time : 12.00s"));
        assert!(text.contains("Baseline Time  : 10.00s"));
    }

    #[test]
    fn test_no_baseline_renders_not_applicable() {
        let summary = RunSummary::new(components(&["docs"]), 1, outcome(1, 0, 0, 2.0), None);
        assert_eq!(summary.percent_saved, None);

        let text = summary.render_text();
        assert!(text.contains("Baseline Time  : N/A"));
        assert!(text.contains("Time Saved     : N/A"));
    }

    #[test]
    fn test_zero_baseline_has_no_percent() {
        let summary = RunSummary::new(ComponentSet::new(), 0, outcome(1, 0, 0, 2.0), Some(0.0));
        assert_eq!(summary.percent_saved, None);
    }

    #[test]
    fn test_render_lists_components() {
        let summary = RunSummary::new(
            components(&["dynamo", "inductor"]),
            6,
            outcome(5, 1, 0, 3.0),
            None,
        );
        let text = summary.render_text();
        assert!(text.contains("Components        : dynamo, inductor"));
        assert!(text.contains("  - dynamo"));
        assert!(text.contains("  - inductor"));
        assert!(text.contains("⚠ PARTIAL_FAIL"));
    }

    #[test]
    fn test_render_empty_components_as_none() {
        let summary = RunSummary::new(ComponentSet::new(), 0, outcome(0, 0, 0, 0.5), None);
        assert!(summary.render_text().contains("Components        : None"));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = RunSummary::new(
            components(&["inductor"]),
            4,
            outcome(4, 0, 0, 7.5),
            Some(10.0),
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "PASSED");
        assert_eq!(json["total_tests"], 4);
    }
}
