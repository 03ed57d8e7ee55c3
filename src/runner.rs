// src/runner.rs

//! The matrix runner: registration API plus the `run(argv)` entry point.
//!
//! Setup is write-once: axes, actions and filters are registered up front,
//! then the registries are only read while parsing and executing.

use std::collections::HashSet;
use std::ffi::OsString;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::{self, CliArgs, RESERVED_NAMES, RESERVED_SHORTS};
use crate::errors::{MatrixError, Result};
use crate::exec::{ExecutionEngine, Executor, ProcessExecutor, RunReport};
use crate::matrix::{self, Filter, FilterChain, Selection};
use crate::model::{Action, Axis, Config};
use crate::registry::Registry;

/// Program name used in usage messages unless overridden.
pub const DEFAULT_PROGRAM: &str = "matrix-runner";

pub struct Runner {
    program: String,
    axes: Registry<Axis>,
    actions: Registry<Action>,
    filters: FilterChain,
    executor: Arc<dyn Executor>,
    matrix_option: bool,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("program", &self.program)
            .field("axes", &self.axes.names().collect::<Vec<_>>())
            .field("actions", &self.actions.names().collect::<Vec<_>>())
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// A runner that executes commands as local processes.
    pub fn new() -> Self {
        Self::with_executor(ProcessExecutor::new())
    }

    pub fn with_executor(executor: impl Executor + 'static) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            axes: Registry::default(),
            actions: Registry::default(),
            filters: FilterChain::new(),
            executor: Arc::new(executor),
            matrix_option: false,
        }
    }

    /// Name shown in usage and help output.
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = name.into();
        self
    }

    /// Accept (and ignore) `--matrix PATH`, for runners built from a manifest.
    pub(crate) fn accept_matrix_option(&mut self) {
        self.matrix_option = true;
    }

    // --- registration ---

    pub fn add_axis(&mut self, axis: Axis) -> Result<&mut Self> {
        self.add_axes([axis])
    }

    /// Register several axes; nothing is registered if any of them is rejected.
    pub fn add_axes(&mut self, axes: impl IntoIterator<Item = Axis>) -> Result<&mut Self> {
        let axes: Vec<Axis> = axes.into_iter().collect();
        let mut names: HashSet<&str> = HashSet::new();
        let mut shorts: Vec<(char, &str)> = Vec::new();

        for axis in &axes {
            axis.validate()?;
            if RESERVED_NAMES.contains(&axis.name()) {
                return Err(MatrixError::InvalidAxis(format!(
                    "axis name '{}' is reserved for a global option",
                    axis.name()
                )));
            }
            if RESERVED_SHORTS.contains(&axis.abbrev()) {
                return Err(MatrixError::InvalidAxis(format!(
                    "abbreviation '-{}' of axis '{}' is reserved for a global option",
                    axis.abbrev(),
                    axis.name()
                )));
            }
            if self.axes.contains(axis.name()) || !names.insert(axis.name()) {
                return Err(MatrixError::DuplicateAxis(axis.name().to_string()));
            }
            let registered = self
                .axes
                .iter()
                .map(|a| (a.abbrev(), a.name()))
                .chain(shorts.iter().copied())
                .find(|(abbrev, _)| *abbrev == axis.abbrev());
            if let Some((abbrev, existing)) = registered {
                return Err(MatrixError::DuplicateAbbrev {
                    abbrev,
                    existing: existing.to_string(),
                });
            }
            shorts.push((axis.abbrev(), axis.name()));
        }

        drop(names);
        drop(shorts);
        for axis in axes {
            info!(axis = %axis.name(), values = axis.values().len(), "registered axis");
            self.axes.insert(axis);
        }
        Ok(self)
    }

    pub fn add_action(&mut self, action: Action) -> Result<&mut Self> {
        self.add_actions([action])
    }

    /// Register several actions; nothing is registered if any of them is
    /// rejected.
    pub fn add_actions(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<&mut Self> {
        let actions: Vec<Action> = actions.into_iter().collect();
        let mut names: HashSet<&str> = HashSet::new();

        for action in &actions {
            if action.name().trim().is_empty() {
                return Err(MatrixError::InvalidAction(
                    "action name must not be empty".to_string(),
                ));
            }
            if action.name().starts_with('-') {
                return Err(MatrixError::InvalidAction(format!(
                    "action name '{}' must not start with '-'",
                    action.name()
                )));
            }
            if self.actions.contains(action.name()) || !names.insert(action.name()) {
                return Err(MatrixError::DuplicateAction(action.name().to_string()));
            }
        }

        drop(names);
        for action in actions {
            info!(action = %action.name(), "registered action");
            self.actions.insert(action);
        }
        Ok(self)
    }

    /// Append a filter to the chain.
    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.register(filter);
        self
    }

    // --- read-only views ---

    pub fn axes(&self) -> &[Axis] {
        self.axes.as_slice()
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.get(name)
    }

    pub fn actions(&self) -> &[Action] {
        self.actions.as_slice()
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    // --- command line ---

    /// The argument parser derived from the current registrations.
    pub fn command(&self) -> clap::Command {
        cli::build_command(
            &self.program,
            self.axes.as_slice(),
            self.actions.as_slice(),
            self.matrix_option,
        )
    }

    /// Parse `argv` (without the program name).
    pub fn parse_args<I, T>(&self, argv: I) -> Result<CliArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        cli::parse_from(self.command(), self.axes.as_slice(), argv)
    }

    /// Per-axis selections with defaults filled in.
    pub fn selections(&self, args: &CliArgs) -> Vec<Selection> {
        args.selections(self.axes.as_slice())
    }

    /// The eligible configs for `args`: combined, then filtered.
    pub fn configs(&self, args: &CliArgs) -> Result<Vec<Config>> {
        matrix::expand(&self.selections(args), args.mode(), &self.filters)
    }

    /// Selected actions, deduplicated, in registration order.
    pub fn selected_actions(&self, args: &CliArgs) -> Result<Vec<Action>> {
        let mut positions = Vec::new();
        for name in &args.actions {
            let position = self
                .actions
                .position(name)
                .ok_or_else(|| MatrixError::UnknownAction(name.clone()))?;
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
        positions.sort_unstable();
        Ok(positions
            .into_iter()
            .filter_map(|p| self.actions.as_slice().get(p).cloned())
            .collect())
    }

    // --- execution ---

    /// Parse `argv` and run the selected actions over the eligible configs.
    pub async fn run<I, T>(&self, argv: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = self.parse_args(argv)?;
        self.run_args(&args).await
    }

    /// Run an already parsed command line.
    ///
    /// An interrupt (Ctrl-C) aborts the remaining work; running processes are
    /// killed and [`MatrixError::Interrupted`] is returned.
    pub async fn run_args(&self, args: &CliArgs) -> Result<RunReport> {
        let configs = self.configs(args)?;
        let actions = self.selected_actions(args)?;

        if args.dry_run {
            info!(configs = configs.len(), "dry run; nothing executed");
            return Ok(RunReport::default());
        }

        let engine = ExecutionEngine::new(Arc::clone(&self.executor), args.jobs);
        tokio::select! {
            report = engine.run(&configs, &actions) => report,
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("interrupt received; aborting remaining matrix runs");
                Err(MatrixError::Interrupted)
            }
        }
    }
}
