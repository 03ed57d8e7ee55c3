// src/cli.rs

//! Command-line interface, derived at startup from the registries.
//!
//! The parser is built with `clap`'s builder API by looping over the
//! registered axes and actions:
//!
//! - one repeatable `--<axis> / -<abbrev> VALUE` option per axis, accepting a
//!   value identifier or any of its aliases;
//! - a required positional `ACTION...` restricted to registered action names;
//! - the fixed global flags (`--pairwise/-2`, `--debug`, `--verbose`,
//!   `--silent`, `--jobs`, `--dry-run`, and `--matrix` for manifest-driven
//!   runners).

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::errors::Result;
use crate::matrix::{Mode, Selection};
use crate::model::{Action, Axis, AxisValue};

/// Long option names an axis may not use.
pub const RESERVED_NAMES: &[&str] = &[
    "action", "pairwise", "debug", "verbose", "silent", "jobs", "dry-run", "matrix", "help",
];

/// Short flags an axis may not use.
pub const RESERVED_SHORTS: &[char] = &['2', 'h'];

const ACTION_ARG: &str = "action";

/// Log level as selected by the global flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Info,
    Debug,
}

/// Values given for one axis; `None` when the option was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub axis: String,
    pub values: Option<Vec<AxisValue>>,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub axes: Vec<AxisSelection>,
    pub actions: Vec<String>,
    pub pairwise: bool,
    pub debug: bool,
    pub verbose: bool,
    pub silent: bool,
    pub dry_run: bool,
    pub jobs: usize,
    pub matrix: Option<PathBuf>,
}

impl CliArgs {
    /// Values explicitly selected for `axis` on the command line.
    pub fn selected(&self, axis: &str) -> Option<&[AxisValue]> {
        self.axes
            .iter()
            .find(|s| s.axis == axis)
            .and_then(|s| s.values.as_deref())
    }

    /// Resolve the selections, falling back to every declared value for the
    /// axes that were not mentioned.
    pub fn selections(&self, axes: &[Axis]) -> Vec<Selection> {
        axes.iter()
            .map(|axis| match self.selected(axis.name()) {
                Some(values) => Selection::new(axis.name(), values.iter().cloned()),
                None => Selection::all(axis),
            })
            .collect()
    }

    pub fn mode(&self) -> Mode {
        if self.pairwise { Mode::Pairwise } else { Mode::Full }
    }

    /// Log level requested by the flags; `--debug` wins over `--verbose`,
    /// which wins over `--silent`.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.debug {
            Some(LogLevel::Debug)
        } else if self.verbose {
            Some(LogLevel::Info)
        } else if self.silent {
            Some(LogLevel::Error)
        } else {
            None
        }
    }
}

/// Build the parser for the given registrations.
pub fn build_command(name: &str, axes: &[Axis], actions: &[Action], matrix_option: bool) -> Command {
    let mut command = Command::new(name.to_string())
        .about("Run actions over a matrix of configurations.")
        .next_line_help(false);

    for axis in axes {
        let lookup = axis.clone();
        let spellings: Vec<String> = axis
            .values()
            .iter()
            .map(|v| v.spellings().collect::<Vec<_>>().join("|"))
            .collect();
        command = command.arg(
            Arg::new(axis.name().to_string())
                .long(axis.name().to_string())
                .short(axis.abbrev())
                .value_name("VALUE")
                .action(ArgAction::Append)
                .num_args(1)
                .value_parser(move |token: &str| lookup.parse_value(token))
                .help(format!("{} [values: {}]", axis.desc(), spellings.join(", ")))
                .help_heading("Matrix axes"),
        );
    }

    let names = actions
        .iter()
        .map(|a| PossibleValue::new(a.name().to_string()).help(a.desc().to_string()));
    command = command.arg(
        Arg::new(ACTION_ARG)
            .value_name("ACTION")
            .required(true)
            .num_args(1..)
            .action(ArgAction::Append)
            .value_parser(PossibleValuesParser::new(names))
            .help("Actions to run for every configuration"),
    );

    command = command
        .arg(
            Arg::new("pairwise")
                .long("pairwise")
                .short('2')
                .action(ArgAction::SetTrue)
                .help("Run a pairwise covering set instead of every combination"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .action(ArgAction::SetTrue)
                .help("Only log errors and skip the summary"),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .value_name("N")
                .default_value("1")
                .value_parser(value_parser!(u16).range(1..))
                .help("Run up to N configuration/action pairs concurrently"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the configurations that would run, execute nothing"),
        );

    if matrix_option {
        command = command.arg(
            Arg::new("matrix")
                .long("matrix")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Matrix manifest (default: Matrix.toml or $MATRIX_RUNNER_FILE)"),
        );
    }

    command
}

/// Parse `argv` (without the program name) with `command`.
pub fn parse_from<I, T>(command: Command, axes: &[Axis], argv: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let program = OsString::from(command.get_name().to_string());
    let args = std::iter::once(program).chain(argv.into_iter().map(Into::into));
    let matches = command.try_get_matches_from(args)?;
    Ok(extract(&matches, axes))
}

fn extract(matches: &ArgMatches, axes: &[Axis]) -> CliArgs {
    let selections = axes
        .iter()
        .map(|axis| AxisSelection {
            axis: axis.name().to_string(),
            values: matches
                .get_many::<AxisValue>(axis.name())
                .map(|values| Selection::new(axis.name(), values.cloned()).values),
        })
        .collect();

    let actions = matches
        .get_many::<String>(ACTION_ARG)
        .map(|names| names.cloned().collect())
        .unwrap_or_default();

    CliArgs {
        axes: selections,
        actions,
        pairwise: matches.get_flag("pairwise"),
        debug: matches.get_flag("debug"),
        verbose: matches.get_flag("verbose"),
        silent: matches.get_flag("silent"),
        dry_run: matches.get_flag("dry-run"),
        jobs: matches.get_one::<u16>("jobs").map_or(1, |&n| usize::from(n)),
        matrix: matches.try_get_one::<PathBuf>("matrix").ok().flatten().cloned(),
    }
}
