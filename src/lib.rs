// src/lib.rs

//! `matrix-runner`: run actions over the cartesian (or pairwise) product of
//! declared configuration axes.
//!
//! The crate can be embedded (register axes, actions and filters on a
//! [`Runner`] and call [`run_with`]) or driven by a `Matrix.toml` manifest
//! through the `matrix-runner` binary ([`run`]).

pub mod cli;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod matrix;
pub mod model;
pub mod registry;
pub mod runner;

use std::ffi::OsString;

use tracing::{debug, info};

pub use crate::cli::CliArgs;
pub use crate::errors::{MatrixError, Result};
pub use crate::exec::{ActionRun, Executor, ProcessExecutor, RunOutcome, RunReport};
pub use crate::matrix::{Filter, Mode};
pub use crate::model::{
    Action, ActionLogic, Axis, AxisValue, Command, CommandBuilder, CommandResult,
    CommandSequence, Config, Sequence, Step, steps,
};
pub use crate::runner::Runner;

use crate::manifest::{MANIFEST_ENV, load_and_validate, manifest_path};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest resolution and loading (`--matrix`, `$MATRIX_RUNNER_FILE`,
///   `Matrix.toml`)
/// - the runner built from it
/// - command-line parsing, logging and execution (see [`run_with`])
///
/// `argv` excludes the program name. Returns the process exit code.
pub async fn run(argv: Vec<OsString>) -> Result<i32> {
    let path = manifest_path(&argv, std::env::var_os(MANIFEST_ENV));
    let manifest = load_and_validate(&path)?;
    let runner = Runner::new().with_manifest(&manifest)?;
    run_with(&runner, argv).await
}

/// Parse `argv` against `runner`, set up logging, execute, print the summary
/// and return the process exit code (see [`RunReport::exit_code`]).
pub async fn run_with<I, T>(runner: &Runner, argv: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = runner.parse_args(argv)?;
    logging::init_logging(args.log_level())?;
    info!(
        axes = runner.axes().len(),
        actions = ?args.actions,
        mode = %args.mode(),
        jobs = args.jobs,
        "starting matrix run"
    );

    if args.dry_run {
        print_dry_run(runner, &args)?;
        return Ok(0);
    }

    let report = runner.run_args(&args).await?;
    if !args.silent {
        println!("{report}");
    }
    Ok(report.exit_code())
}

/// Dry-run output: the eligible configs and the actions that would run.
fn print_dry_run(runner: &Runner, args: &CliArgs) -> Result<()> {
    let configs = runner.configs(args)?;
    let actions = runner.selected_actions(args)?;

    println!("matrix-runner dry-run ({} mode)", args.mode());
    let names: Vec<&str> = actions.iter().map(Action::name).collect();
    println!("actions: {}", names.join(", "));
    println!("configs ({}):", configs.len());
    for config in &configs {
        println!("  - {config}");
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
