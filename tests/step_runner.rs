// tests/step_runner.rs
//
// Command rendering and the process-backed runner.

use pkgdag::config::StepsSection;
use pkgdag::exec::StepTemplates;
use pkgdag::plan::BuildStep;
use pkgdag::types::StepKind;

fn step(kind: StepKind, package: &str) -> BuildStep {
    BuildStep {
        kind,
        package: package.to_string(),
        arch: "x86_64".to_string(),
        distro: "23".to_string(),
        workdir: format!("{package}/work"),
    }
}

#[test]
fn default_templates_render_chroot_builder_commands() {
    let templates = StepTemplates::from_config(&StepsSection::default());

    let source = templates
        .render(&step(StepKind::BuildSource, "libfoo"), None)
        .unwrap();
    let binary = templates
        .render(
            &step(StepKind::BuildBinary, "libfoo"),
            Some("../results/libfoo-1.0-1.fc23.src.rpm"),
        )
        .unwrap();

    assert_eq!(
        source,
        "mock --root fedora-23-x86_64 --resultdir ../results --buildsrpm --spec libfoo.spec --sources libfoo/work"
    );
    assert_eq!(
        binary,
        "mock --root fedora-23-x86_64 --resultdir ../results --rebuild ../results/libfoo-1.0-1.fc23.src.rpm"
    );
}

#[test]
fn binary_step_without_captured_artifact_fails_to_render() {
    let templates = StepTemplates::from_config(&StepsSection::default());

    let err = templates
        .render(&step(StepKind::BuildBinary, "libfoo"), None)
        .unwrap_err();

    assert!(err.to_string().contains("libfoo"));
}

#[test]
fn templates_without_srpm_need_no_artifact() {
    let templates = StepTemplates {
        build_source: "make -C {workdir} srpm".to_string(),
        build_binary: "echo {package} {arch} {distro} {root}".to_string(),
        resultdir: "out".to_string(),
        root_prefix: "custom".to_string(),
    };

    let cmd = templates
        .render(&step(StepKind::BuildBinary, "bar"), None)
        .unwrap();

    assert_eq!(cmd, "echo bar x86_64 23 custom-23-x86_64");
}

#[cfg(unix)]
mod process {
    use super::step;

    use regex::Regex;

    use pkgdag::config::StepsSection;
    use pkgdag::engine::{Pipeline, StepOutcome};
    use pkgdag::exec::{RealStepRunner, StepRunner, StepTemplates, run_shell};
    use pkgdag::types::StepKind;
    use pkgdag_test_utils::{init_tracing, with_timeout};

    fn runner(build_source: &str, build_binary: &str) -> RealStepRunner {
        let steps = StepsSection {
            build_source: build_source.to_string(),
            build_binary: build_binary.to_string(),
            resultdir: "/results".to_string(),
            ..StepsSection::default()
        };
        RealStepRunner::from_config(&steps).unwrap()
    }

    #[tokio::test]
    async fn run_shell_reports_exit_code_and_capture() {
        init_tracing();
        let re = Regex::new(r"Wrote: .*/([^/]*\.src\.rpm)").unwrap();

        let ok = with_timeout(run_shell(
            "srpm test",
            "echo 'Wrote: /tmp/build/foo-1.0-1.src.rpm'; echo done",
            None,
            Some(&re),
        ))
        .await
        .unwrap();
        assert!(ok.success);
        assert_eq!(ok.exit_code, 0);
        assert_eq!(ok.captured.as_deref(), Some("foo-1.0-1.src.rpm"));

        let failed = with_timeout(run_shell("rpm test", "echo oops >&2; exit 7", None, None))
            .await
            .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 7);
        assert_eq!(failed.captured, None);
    }

    #[tokio::test]
    async fn source_artifact_flows_into_binary_step() {
        init_tracing();
        let mut runner = runner(
            "echo 'Wrote: /build/{package}-1.0-1.src.rpm'",
            "test '{srpm}' = '/results/{package}-1.0-1.src.rpm'",
        );

        let source = with_timeout(runner.run_step(step(StepKind::BuildSource, "libfoo")))
            .await
            .unwrap();
        assert_eq!(source, StepOutcome::Success);
        assert_eq!(
            runner.artifact_for("libfoo"),
            Some("/results/libfoo-1.0-1.src.rpm")
        );

        let binary = with_timeout(runner.run_step(step(StepKind::BuildBinary, "libfoo")))
            .await
            .unwrap();
        assert_eq!(binary, StepOutcome::Success);
    }

    #[tokio::test]
    async fn binary_step_without_source_artifact_is_an_error() {
        let mut runner = runner("true", "echo {srpm}");

        let result = with_timeout(runner.run_step(step(StepKind::BuildBinary, "bar"))).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn real_pipeline_halts_on_failing_command() {
        init_tracing();
        let steps = vec![
            step(StepKind::BuildSource, "a"),
            step(StepKind::BuildBinary, "a"),
            step(StepKind::BuildSource, "b"),
        ];
        let runner = RealStepRunner::new(
            StepTemplates {
                build_source: "exit 0".to_string(),
                build_binary: "exit 4".to_string(),
                resultdir: "/results".to_string(),
                root_prefix: "fedora".to_string(),
            },
            Regex::new(r"Wrote: .*/([^/]*\.src\.rpm)").unwrap(),
        );

        let report = with_timeout(Pipeline::new(steps, runner).run()).await;

        let (failed, code) = report.failed().unwrap();
        assert_eq!(failed.display_name(), "rpm a 23/x86_64");
        assert_eq!(code, 4);
        assert_eq!(report.completed().count(), 1);
        assert_eq!(report.not_run().count(), 1);
    }
}
