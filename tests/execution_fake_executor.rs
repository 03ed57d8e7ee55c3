// tests/execution_fake_executor.rs

mod common;
use crate::common::builders::{conditional_action, demo_runner, echo_action, guarded_action};
use crate::common::{FakeExecutor, TestResult, command_log, init_tracing, programs, with_timeout};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use matrix_runner::{
    Action, ActionLogic, Command, CommandSequence, Config, Filter, MatrixError, RunOutcome,
    Sequence, Step, steps,
};

#[tokio::test]
async fn full_matrix_runs_every_config() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![echo_action("build")]);

    let report = with_timeout(runner.run(["build"])).await?;

    assert_eq!(report.runs().len(), 27);
    assert_eq!(log.lock().unwrap().len(), 27);
    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn pairwise_matrix_runs_nine_configs() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![echo_action("build")]);

    let report = with_timeout(runner.run(["--pairwise", "build"])).await?;

    assert_eq!(report.runs().len(), 9);
    assert_eq!(log.lock().unwrap().len(), 9);
    Ok(())
}

#[tokio::test]
async fn results_are_ordered_and_tied_to_their_config() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(
        FakeExecutor::new(log.clone()),
        vec![echo_action("build"), echo_action("test")],
    );

    let report = with_timeout(runner.run(["-a", "v1", "-b", "v1", "test", "build"])).await?;

    let order: Vec<(String, String)> = report
        .runs()
        .iter()
        .map(|run| (run.config.to_string(), run.action.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("alpha=value1, beta=value1, gamma=value1".to_string(), "build".to_string()),
            ("alpha=value1, beta=value1, gamma=value1".to_string(), "test".to_string()),
            ("alpha=value1, beta=value1, gamma=value2".to_string(), "build".to_string()),
            ("alpha=value1, beta=value1, gamma=value2".to_string(), "test".to_string()),
            ("alpha=value1, beta=value1, gamma=value3".to_string(), "build".to_string()),
            ("alpha=value1, beta=value1, gamma=value3".to_string(), "test".to_string()),
        ]
    );

    for run in report.runs() {
        for result in &run.results {
            assert_eq!(result.command.config(), &run.config);
            assert_eq!(
                result.stdout_text(),
                format!("echo {} {}\n", run.action, run.config)
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn guarded_action_may_yield_nothing() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(
        FakeExecutor::new(log.clone()),
        vec![guarded_action("only-v2", "alpha", "value2")],
    );

    let report = with_timeout(runner.run(["only-v2"])).await?;

    assert_eq!(report.runs().len(), 27);
    assert_eq!(log.lock().unwrap().len(), 9);
    let skipped = report
        .runs()
        .iter()
        .filter(|run| run.outcome() == RunOutcome::Skipped)
        .count();
    assert_eq!(skipped, 18);
    assert_eq!(report.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn later_commands_depend_on_earlier_results() -> TestResult {
    init_tracing();

    // `first` succeeds: `second` follows.
    let log = command_log();
    let runner = demo_runner(
        FakeExecutor::new(log.clone()),
        vec![conditional_action("chain", 0)],
    );
    with_timeout(runner.run(["-a", "v1", "-b", "v1", "-c", "v1", "chain"])).await?;
    assert_eq!(programs(&log), vec!["first", "second"]);

    // `first` fails: the action stops on its own.
    let log = command_log();
    let executor = FakeExecutor::new(log.clone())
        .with_exit_codes(|c: &Command| if c.argv()[0] == "first" { 3 } else { 0 });
    let runner = demo_runner(executor, vec![conditional_action("chain", 0)]);
    let report = with_timeout(runner.run(["-a", "v1", "-b", "v1", "-c", "v1", "chain"])).await?;
    assert_eq!(programs(&log), vec!["first"]);
    assert_eq!(report.exit_code(), 3);
    Ok(())
}

#[tokio::test]
async fn failures_do_not_stop_the_engine() -> TestResult {
    init_tracing();
    let log = command_log();
    let executor = FakeExecutor::new(log.clone()).with_exit_codes(|_: &Command| 1);
    let runner = demo_runner(executor, vec![echo_action("build")]);

    let report = with_timeout(runner.run(["-a", "v1", "build"])).await?;

    assert_eq!(log.lock().unwrap().len(), 9);
    assert_eq!(report.failed_runs().count(), 9);
    assert!(!report.is_success());
    Ok(())
}

#[tokio::test]
async fn exit_code_is_the_worst_failure() -> TestResult {
    init_tracing();
    let log = command_log();
    let executor = FakeExecutor::new(log.clone()).with_exit_codes(|c: &Command| {
        if c.config().is("gamma", "v3") {
            7
        } else if c.config().is("gamma", "v2") {
            2
        } else {
            0
        }
    });
    let runner = demo_runner(executor, vec![echo_action("build")]);

    let report = with_timeout(runner.run(["build"])).await?;
    assert_eq!(report.exit_code(), 7);
    Ok(())
}

#[tokio::test]
async fn abnormal_exit_codes_map_to_one() -> TestResult {
    init_tracing();
    let executor = FakeExecutor::new(command_log()).with_exit_codes(|c: &Command| {
        if c.config().is("alpha", "v1") { -1 } else { 300 }
    });
    let runner = demo_runner(executor, vec![echo_action("build")]);

    let report = with_timeout(runner.run(["-b", "v1", "-c", "v1", "build"])).await?;
    assert_eq!(report.failed_runs().count(), 3);
    assert_eq!(report.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn accepted_exit_codes_count_as_success() -> TestResult {
    init_tracing();
    let lenient = Action::from_fn("lint", "lint, warnings allowed", |config: &Config| {
        Sequence::new([Command::new(config, ["lint"]).exit_codes([0, 1])])
    });
    let executor = FakeExecutor::new(command_log()).with_exit_codes(|_: &Command| 1);
    let runner = demo_runner(executor, vec![lenient]);

    let report = with_timeout(runner.run(["-a", "v1", "-b", "v1", "lint"])).await?;
    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn halting_sequence_skips_the_rest() -> TestResult {
    init_tracing();
    let log = command_log();
    let action = Action::from_fn("steps", "configure, build, test", |config: &Config| {
        Sequence::new([
            Command::new(config, ["configure"]),
            Command::new(config, ["make"]),
            Command::new(config, ["check"]),
        ])
        .halt_on_failure()
    });
    let executor =
        FakeExecutor::new(log.clone()).with_exit_codes(|c: &Command| if c.argv()[0] == "make" { 2 } else { 0 });
    let runner = demo_runner(executor, vec![action]);

    with_timeout(runner.run(["-a", "v1", "-b", "v1", "-c", "v1", "steps"])).await?;
    assert_eq!(programs(&log), vec!["configure", "make"]);
    Ok(())
}

#[tokio::test]
async fn parallel_runs_keep_sequential_report_order() -> TestResult {
    init_tracing();
    let sequential = {
        let runner = demo_runner(FakeExecutor::new(command_log()), vec![echo_action("build")]);
        with_timeout(runner.run(["build"])).await?
    };

    let log = command_log();
    // Earlier configs take longer, so completions arrive out of order.
    let executor = FakeExecutor::new(log.clone()).with_delay(|c: &Command| {
        if c.config().is("gamma", "v1") {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(1)
        }
    });
    let runner = demo_runner(executor, vec![echo_action("build")]);
    let parallel = with_timeout(runner.run(["--jobs", "4", "build"])).await?;

    assert_eq!(parallel, sequential);
    assert_eq!(log.lock().unwrap().len(), 27);
    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![echo_action("build")]);

    let report = with_timeout(runner.run(["--dry-run", "build"])).await?;
    assert!(report.runs().is_empty());
    assert!(log.lock().unwrap().is_empty());
    Ok(())
}

struct Broken;

impl ActionLogic for Broken {
    fn start(&self, config: &Config) -> anyhow::Result<Box<dyn CommandSequence>> {
        Err(anyhow!("cannot prepare {config}"))
    }
}

#[tokio::test]
async fn action_errors_abort_the_run() -> TestResult {
    init_tracing();
    let log = command_log();
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![Action::new("broken", "fails", Broken)]);

    let err = with_timeout(runner.run(["broken"])).await.unwrap_err();
    match err {
        MatrixError::Action { action, config, .. } => {
            assert_eq!(action, "broken");
            assert_eq!(config, "alpha=value1, beta=value1, gamma=value1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(log.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn resume_errors_abort_the_run() -> TestResult {
    init_tracing();
    let log = command_log();
    let action = Action::from_fn("flaky", "errors after one command", |config: &Config| {
        let config = config.clone();
        steps(move |results| match results.len() {
            0 => Ok(Step::Run(Command::new(&config, ["inspect"]))),
            _ => Err(anyhow!("unexpected inspect output")),
        })
    });
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![action]);

    let err = with_timeout(runner.run(["--jobs", "2", "flaky"])).await.unwrap_err();
    assert!(matches!(err, MatrixError::Action { .. }));
    Ok(())
}

#[tokio::test]
async fn empty_command_is_rejected() -> TestResult {
    init_tracing();
    let action = Action::from_fn("hollow", "yields an empty argv", |config: &Config| {
        Sequence::new([Command::new(config, Vec::<String>::new())])
    });
    let runner = demo_runner(FakeExecutor::new(command_log()), vec![action]);

    let err = with_timeout(runner.run(["hollow"])).await.unwrap_err();
    assert!(matches!(err, MatrixError::EmptyCommand { .. }));
    Ok(())
}

#[tokio::test]
async fn filter_errors_abort_before_execution() -> TestResult {
    init_tracing();
    let log = command_log();
    let mut runner = demo_runner(FakeExecutor::new(log.clone()), vec![echo_action("build")]);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    runner.add_filter(Filter::new("fails-late", move |config: &Config| {
        seen.fetch_add(1, Ordering::SeqCst);
        if config.is("gamma", "v3") {
            Err(anyhow!("no data for gamma"))
        } else {
            Ok(true)
        }
    }));

    let err = with_timeout(runner.run(["build"])).await.unwrap_err();
    assert!(matches!(err, MatrixError::Filter { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(log.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn each_config_starts_a_fresh_sequence() -> TestResult {
    init_tracing();
    let log = command_log();
    let starts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&starts);
    let action = Action::from_fn("count", "counts starts", move |config: &Config| {
        counter.fetch_add(1, Ordering::SeqCst);
        Sequence::new([Command::new(config, ["count"])])
    });
    let runner = demo_runner(FakeExecutor::new(log.clone()), vec![action]);

    with_timeout(runner.run(["-2", "count"])).await?;
    assert_eq!(starts.load(Ordering::SeqCst), 9);
    Ok(())
}
