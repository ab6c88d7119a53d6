// tests/pipeline.rs

use std::sync::{Arc, Mutex};

use pkgdag::engine::{CoreCommand, Pipeline, PipelineCore, StepOutcome, StepStatus};
use pkgdag::errors::PkgdagError;
use pkgdag::plan::{BuildPlan, BuildStep, BuildTarget, PlanExpander};
use pkgdag_test_utils::{FakeStepRunner, PackageBuilder, init_tracing, with_timeout};

fn steps_for(names: &[&str]) -> Vec<BuildStep> {
    let plan = BuildPlan::new(names.iter().map(|n| PackageBuilder::new(n).build()).collect());
    PlanExpander::new(BuildTarget {
        arch: "x86_64".to_string(),
        distro: "23".to_string(),
    })
    .expand(&plan)
}

#[test]
fn core_walks_steps_in_order() {
    let mut core = PipelineCore::new(steps_for(&["a", "b"]));

    assert_eq!(core.start(), CoreCommand::Run(0));
    assert_eq!(core.status_of(0), Some(StepStatus::Running));
    assert_eq!(core.record(StepOutcome::Success), CoreCommand::Run(1));
    assert_eq!(core.record(StepOutcome::Success), CoreCommand::Run(2));
    assert_eq!(core.record(StepOutcome::Success), CoreCommand::Run(3));
    assert!(!core.is_finished());
    assert_eq!(core.record(StepOutcome::Success), CoreCommand::Finish);
    assert!(core.is_finished());

    let report = core.into_report();
    assert!(report.is_success());
    assert_eq!(report.completed().count(), 4);
}

#[test]
fn core_halts_on_first_failure() {
    let mut core = PipelineCore::new(steps_for(&["a", "b"]));

    assert_eq!(core.start(), CoreCommand::Run(0));
    assert_eq!(
        core.record(StepOutcome::Failed(2)),
        CoreCommand::Halt { index: 0, code: 2 }
    );
    assert!(core.is_finished());
    // Nothing restarts after a halt.
    assert_eq!(
        core.record(StepOutcome::Success),
        CoreCommand::Halt { index: 0, code: 2 }
    );

    let report = core.into_report();
    assert!(!report.is_success());
    let (failed, code) = report.failed().unwrap();
    assert_eq!(failed.display_name(), "srpm a 23/x86_64");
    assert_eq!(code, 2);
    assert_eq!(report.not_run().count(), 3);
    assert_eq!(report.completed().count(), 0);
}

#[test]
fn empty_core_finishes_immediately() {
    let mut core = PipelineCore::new(Vec::new());
    assert!(core.is_empty());
    assert_eq!(core.start(), CoreCommand::Finish);
    assert!(core.into_report().is_success());
}

#[tokio::test]
async fn pipeline_runs_every_step_in_order() {
    init_tracing();
    let executed = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeStepRunner::new(Arc::clone(&executed));

    let report = with_timeout(Pipeline::new(steps_for(&["libfoo", "bar"]), runner).run()).await;

    assert!(report.is_success());
    assert_eq!(
        *executed.lock().unwrap(),
        vec![
            "srpm libfoo 23/x86_64",
            "rpm libfoo 23/x86_64",
            "srpm bar 23/x86_64",
            "rpm bar 23/x86_64",
        ]
    );
}

#[tokio::test]
async fn pipeline_stops_after_failed_step() {
    init_tracing();
    let executed = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeStepRunner::new(Arc::clone(&executed)).fail("rpm libfoo 23/x86_64", 30);

    let report =
        with_timeout(Pipeline::new(steps_for(&["libfoo", "bar", "baz"]), runner).run()).await;

    assert_eq!(
        *executed.lock().unwrap(),
        vec!["srpm libfoo 23/x86_64", "rpm libfoo 23/x86_64"]
    );
    let not_run: Vec<_> = report.not_run().map(|s| s.display_name()).collect();
    assert_eq!(not_run.len(), 4);
    assert_eq!(not_run[0], "srpm bar 23/x86_64");

    match report.into_result() {
        Err(PkgdagError::StepFailed { step, code }) => {
            assert_eq!(step, "rpm libfoo 23/x86_64");
            assert_eq!(code, 30);
        }
        other => panic!("Expected StepFailed, got: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn runner_error_counts_as_failure() {
    let executed = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeStepRunner::new(Arc::clone(&executed)).error("srpm bar 23/x86_64");

    let report = with_timeout(Pipeline::new(steps_for(&["bar", "baz"]), runner).run()).await;

    let (step, code) = report.failed().unwrap();
    assert_eq!(step.package, "bar");
    assert_eq!(code, -1);
    assert_eq!(executed.lock().unwrap().len(), 1);
    assert_eq!(
        report.entries().last().map(|(_, s)| *s),
        Some(StepStatus::NotRun)
    );
}
