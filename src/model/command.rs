// src/model/command.rs

//! Commands produced by actions, the builders that create them, and the
//! results of running them.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::model::config::Config;

/// A resolved external-process invocation, tied to the config it was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: Option<String>,
    argv: Vec<String>,
    config: Config,
    needs_shell: bool,
    exit_codes: Vec<i32>,
}

impl Command {
    pub fn new<I, S>(config: &Config, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            argv: argv.into_iter().map(Into::into).collect(),
            config: config.clone(),
            needs_shell: false,
            exit_codes: vec![0],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run the command line through the platform shell (`sh -c` / `cmd /C`).
    pub fn needs_shell(mut self, needs_shell: bool) -> Self {
        self.needs_shell = needs_shell;
        self
    }

    /// Exit codes that count as success. Defaults to `[0]`.
    pub fn exit_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.exit_codes = codes.into_iter().collect();
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shell(&self) -> bool {
        self.needs_shell
    }

    pub fn accepted_exit_codes(&self) -> &[i32] {
        &self.exit_codes
    }

    pub fn accepts(&self, exit_code: i32) -> bool {
        self.exit_codes.contains(&exit_code)
    }

    /// The argv joined with single spaces (what the shell receives when
    /// `needs_shell` is set).
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

type BuildFn = dyn Fn(&Config, &[&str]) -> Vec<String> + Send + Sync;

/// A registered command-builder callback.
///
/// The callback is a pure function of the config and the static arguments
/// given at the call site; any host-specific argv construction belongs in it.
#[derive(Clone)]
pub struct CommandBuilder {
    name: String,
    build: Arc<BuildFn>,
    needs_shell: bool,
    exit_codes: Vec<i32>,
}

impl fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("needs_shell", &self.needs_shell)
            .field("exit_codes", &self.exit_codes)
            .finish_non_exhaustive()
    }
}

impl CommandBuilder {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&Config, &[&str]) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
            needs_shell: false,
            exit_codes: vec![0],
        }
    }

    pub fn needs_shell(mut self, needs_shell: bool) -> Self {
        self.needs_shell = needs_shell;
        self
    }

    pub fn exit_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.exit_codes = codes.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a command for `config`.
    pub fn build(&self, config: &Config, args: &[&str]) -> Command {
        Command::new(config, (self.build)(config, args))
            .with_name(self.name.clone())
            .needs_shell(self.needs_shell)
            .exit_codes(self.exit_codes.iter().copied())
    }
}

/// Captured outcome of running one [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub command: Command,
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandResult {
    pub fn new(command: Command, exit_code: i32, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Whether the exit code is one the command accepts.
    pub fn success(&self) -> bool {
        self.command.accepts(self.exit_code)
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}
