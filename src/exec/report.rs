// src/exec/report.rs

//! Aggregated results of an invocation.
//!
//! Exit-status policy: an invocation succeeds (exit code 0) when every
//! command result was successful according to its accepted exit codes.
//! Otherwise the worst failing result decides: its exit code when that lies
//! in `1..=255`, and `1` for anything else (abnormal termination, or an
//! unexpected `0` for a command that only accepts other codes). Pairs that
//! yielded no command never fail the invocation.

use std::fmt;

use crate::model::{CommandResult, Config};

/// Outcome of one (config, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every command succeeded.
    Passed,
    /// At least one command failed.
    Failed,
    /// The action yielded no command for this config.
    Skipped,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Passed => f.write_str("passed"),
            RunOutcome::Failed => f.write_str("failed"),
            RunOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

/// Results of running one action for one config, in yield order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRun {
    pub config: Config,
    pub action: String,
    pub results: Vec<CommandResult>,
}

impl ActionRun {
    pub fn outcome(&self) -> RunOutcome {
        if self.results.is_empty() {
            RunOutcome::Skipped
        } else if self.results.iter().all(CommandResult::success) {
            RunOutcome::Passed
        } else {
            RunOutcome::Failed
        }
    }
}

/// Every (config, action) run of an invocation, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    runs: Vec<ActionRun>,
}

impl RunReport {
    pub fn new(runs: Vec<ActionRun>) -> Self {
        Self { runs }
    }

    pub fn runs(&self) -> &[ActionRun] {
        &self.runs
    }

    /// All command results across the invocation, in execution order.
    pub fn results(&self) -> impl Iterator<Item = &CommandResult> {
        self.runs.iter().flat_map(|run| run.results.iter())
    }

    pub fn failed_runs(&self) -> impl Iterator<Item = &ActionRun> {
        self.runs
            .iter()
            .filter(|run| run.outcome() == RunOutcome::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.results().all(CommandResult::success)
    }

    /// Process exit code for this report (see the module docs).
    pub fn exit_code(&self) -> i32 {
        self.results()
            .filter(|r| !r.success())
            .map(|r| if (1..=255).contains(&r.exit_code) { r.exit_code } else { 1 })
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix Summary")?;
        writeln!(f, "==============")?;
        for run in &self.runs {
            writeln!(
                f,
                "{:<8} {:<16} [{}] ({} command{})",
                run.outcome().to_string(),
                run.action,
                run.config,
                run.results.len(),
                if run.results.len() == 1 { "" } else { "s" }
            )?;
        }
        let failed = self.failed_runs().count();
        write!(f, "{} run(s), {} failed", self.runs.len(), failed)
    }
}
