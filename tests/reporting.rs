// tests/reporting.rs

mod common;
use crate::common::builders::{demo_runner, echo_action, guarded_action};
use crate::common::{FakeExecutor, TestResult, command_log, init_tracing, with_timeout};

use matrix_runner::cli::LogLevel;
use matrix_runner::logging::resolve_level;
use matrix_runner::{Command, run_with};
use tracing::Level;

#[test]
fn log_level_priority() {
    assert_eq!(resolve_level(None, None), Level::WARN);
    assert_eq!(resolve_level(None, Some("debug")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some(" Info ")), Level::INFO);
    assert_eq!(resolve_level(None, Some("TRACE")), Level::TRACE);
    assert_eq!(resolve_level(None, Some("loud")), Level::WARN);
    assert_eq!(resolve_level(Some(LogLevel::Error), Some("trace")), Level::ERROR);
    assert_eq!(resolve_level(Some(LogLevel::Debug), None), Level::DEBUG);
}

#[tokio::test]
async fn summary_lists_every_pair() -> TestResult {
    init_tracing();
    let executor = FakeExecutor::new(command_log())
        .with_exit_codes(|c: &Command| if c.config().is("gamma", "v3") { 1 } else { 0 });
    let runner = demo_runner(
        executor,
        vec![echo_action("build"), guarded_action("extra", "gamma", "v1")],
    );

    let report = with_timeout(runner.run(["-a", "v1", "-b", "v1", "build", "extra"])).await?;
    let summary = report.to_string();

    assert!(summary.starts_with("Matrix Summary"));
    assert!(summary.contains("passed   build"));
    assert!(summary.contains("failed   build"));
    assert!(summary.contains("skipped  extra"));
    assert!(summary.ends_with("6 run(s), 1 failed"));
    Ok(())
}

#[tokio::test]
async fn run_with_returns_the_exit_code() -> TestResult {
    init_tracing();
    let executor = FakeExecutor::new(command_log()).with_exit_codes(|_: &Command| 4);
    let runner = demo_runner(executor, vec![echo_action("build")]);

    let code = with_timeout(run_with(&runner, ["--silent", "-a", "v1", "build"])).await?;
    assert_eq!(code, 4);

    let code = with_timeout(run_with(&runner, ["--dry-run", "build"])).await?;
    assert_eq!(code, 0);
    Ok(())
}
