//! End-to-end selection pipeline orchestration.

use std::collections::BTreeSet;

use tracing::{info, warn};

use tselect_core::error::Result;
use tselect_core::{
    BaselineRecord, BaselineStore, ClassTestCounts, ComponentSet, Invocation, OwnershipRules,
    RunOutcome, RunSummary, SelectedClasses, TestCatalog,
};

use crate::pytest::TestRunner;

/// Everything derived from a change set before anything runs.
#[derive(Debug, Clone)]
pub struct SelectionPlan {
    pub changed: BTreeSet<String>,
    pub components: ComponentSet,
    pub selected: SelectedClasses,
    pub class_counts: ClassTestCounts,
    pub total_tests: usize,
    pub invocation: Invocation,
}

/// Wires resolver → expander → builder → executor → reporter.
///
/// The baseline store and test runner are injected so the pipeline is
/// testable with fakes. Stages run sequentially; the only await point is the
/// runner subprocess.
pub struct SelectionPipeline<'a> {
    rules: &'a OwnershipRules,
    catalog: &'a TestCatalog,
    store: &'a dyn BaselineStore,
}

impl<'a> SelectionPipeline<'a> {
    pub fn new(
        rules: &'a OwnershipRules,
        catalog: &'a TestCatalog,
        store: &'a dyn BaselineStore,
    ) -> Self {
        Self {
            rules,
            catalog,
            store,
        }
    }

    /// Derive components, selected classes, and the invocation from a change
    /// set. Pure except for progress events.
    pub fn plan(&self, changed: BTreeSet<String>) -> Result<SelectionPlan> {
        let components = self.rules.resolve(&changed);
        info!(
            changed = changed.len(),
            components = components.len(),
            "resolved affected components"
        );

        let (selected, class_counts) = self.catalog.expand(&components);
        let total_tests = class_counts.values().sum();
        info!(
            classes = selected.len(),
            tests = total_tests,
            "expanded components to test classes"
        );

        let invocation = Invocation::build(&selected)?;
        if !invocation.is_filtered() {
            info!("no classes selected, falling back to full suite");
        }

        Ok(SelectionPlan {
            changed,
            components,
            selected,
            class_counts,
            total_tests,
            invocation,
        })
    }

    /// Execute a plan and report against the stored baseline.
    ///
    /// When no baseline exists yet the observed duration is persisted as the
    /// new baseline (one-shot bootstrap). Baseline read and bootstrap-write
    /// failures degrade with a warning; they never abort a completed run.
    pub async fn execute(
        &self,
        plan: &SelectionPlan,
        runner: &dyn TestRunner,
    ) -> anyhow::Result<RunSummary> {
        let baseline = match self.store.get().await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "baseline read failed, proceeding without one");
                None
            }
        };

        let outcome = runner.run(&plan.invocation).await?;
        info!(
            return_code = outcome.return_code,
            passed = outcome.passed,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "run completed"
        );

        let baseline_seconds = match baseline {
            Some(record) => Some(record.duration_seconds),
            None => {
                info!("no baseline found, saving this run as baseline");
                let record = BaselineRecord::observed_now(outcome.duration_seconds);
                if let Err(e) = self.store.set(record).await {
                    warn!(error = %e, "failed to persist bootstrap baseline");
                }
                Some(outcome.duration_seconds)
            }
        };

        Ok(RunSummary::new(
            plan.components.clone(),
            plan.total_tests,
            outcome,
            baseline_seconds,
        ))
    }
}

/// Run the full-suite baseline command and unconditionally overwrite the
/// stored baseline with the observed duration.
///
/// Unlike the run-time bootstrap, this needs no ownership rules or catalog,
/// so it takes the store and runner directly.
pub async fn record_baseline(
    store: &dyn BaselineStore,
    runner: &dyn TestRunner,
) -> anyhow::Result<RunOutcome> {
    let invocation = Invocation::baseline();
    let outcome = runner.run(&invocation).await?;

    store
        .set(BaselineRecord::observed_now(outcome.duration_seconds))
        .await?;
    info!(
        duration_seconds = outcome.duration_seconds,
        "baseline recorded"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tselect_core::MemoryBaselineStore;

    /// Canned runner: returns a fixed outcome and records invocations.
    struct FakeRunner {
        outcome: RunOutcome,
        seen: Mutex<Vec<Invocation>>,
    }

    impl FakeRunner {
        fn passing(duration_seconds: f64) -> Self {
            Self {
                outcome: RunOutcome {
                    return_code: 0,
                    passed: 4,
                    failed: 0,
                    skipped: 0,
                    duration_seconds,
                },
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TestRunner for FakeRunner {
        async fn run(&self, invocation: &Invocation) -> anyhow::Result<RunOutcome> {
            self.seen.lock().unwrap().push(invocation.clone());
            Ok(self.outcome.clone())
        }
    }

    fn rules() -> OwnershipRules {
        serde_json::from_value(json!({"inductor": ["torch/_inductor/"]})).unwrap()
    }

    fn catalog() -> TestCatalog {
        serde_json::from_value(json!({
            "test_root": "test/inductor",
            "components": {
                "inductor": {
                    "test_x.py": {
                        "TestX": { "tests": { "t1": {}, "t2": {}, "t3": {}, "t4": {} } }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn changes(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_plan_selects_affected_classes() {
        let rules = rules();
        let catalog = catalog();
        let store = MemoryBaselineStore::new();
        let pipeline = SelectionPipeline::new(&rules, &catalog, &store);

        let plan = pipeline
            .plan(changes(&["torch/_inductor/ir.py"]))
            .unwrap();
        assert_eq!(plan.components.len(), 1);
        assert_eq!(plan.selected.len(), 1);
        assert_eq!(plan.total_tests, 4);
        assert!(plan.invocation.is_filtered());
    }

    #[test]
    fn test_empty_change_set_plans_full_suite() {
        let rules = rules();
        let catalog = catalog();
        let store = MemoryBaselineStore::new();
        let pipeline = SelectionPipeline::new(&rules, &catalog, &store);

        let plan = pipeline.plan(BTreeSet::new()).unwrap();
        assert!(plan.components.is_empty());
        assert!(plan.selected.is_empty());
        assert!(!plan.invocation.is_filtered());
    }

    #[tokio::test]
    async fn test_execute_bootstraps_baseline_when_absent() {
        let rules = rules();
        let catalog = catalog();
        let store = MemoryBaselineStore::new();
        let pipeline = SelectionPipeline::new(&rules, &catalog, &store);
        let runner = FakeRunner::passing(6.0);

        let plan = pipeline.plan(changes(&["torch/_inductor/ir.py"])).unwrap();
        let summary = pipeline.execute(&plan, &runner).await.unwrap();

        // First run: baseline is the observed duration, nothing saved yet.
        assert_eq!(summary.baseline_seconds, Some(6.0));
        assert_eq!(summary.time_saved_seconds, 0.0);

        let stored = store.get().await.unwrap().unwrap();
        assert!((stored.duration_seconds - 6.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_execute_reports_savings_against_existing_baseline() {
        let rules = rules();
        let catalog = catalog();
        let store = MemoryBaselineStore::with_baseline(10.0);
        let pipeline = SelectionPipeline::new(&rules, &catalog, &store);
        let runner = FakeRunner::passing(7.5);

        let plan = pipeline.plan(changes(&["torch/_inductor/ir.py"])).unwrap();
        let summary = pipeline.execute(&plan, &runner).await.unwrap();

        assert_eq!(summary.baseline_seconds, Some(10.0));
        assert!((summary.time_saved_seconds - 2.5).abs() < 1e-9);
        assert!((summary.percent_saved.unwrap() - 25.0).abs() < 1e-9);

        // Existing baseline is never overwritten by a run.
        let stored = store.get().await.unwrap().unwrap();
        assert!((stored.duration_seconds - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_record_baseline_overwrites_unconditionally() {
        let store = MemoryBaselineStore::with_baseline(99.0);
        let runner = FakeRunner::passing(12.0);

        record_baseline(&store, &runner).await.unwrap();

        let stored = store.get().await.unwrap().unwrap();
        assert!((stored.duration_seconds - 12.0).abs() < f64::EPSILON);

        // The baseline op always runs the unfiltered suite.
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_filtered());
    }
}
