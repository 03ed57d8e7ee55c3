// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The execution engine talks to an `Executor` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`process`](super::process).

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::model::{Command, CommandResult};

/// Trait abstracting how a single command is executed.
///
/// Implementations must run the command to completion before resolving, and
/// must not retry it. A non-zero exit code is a regular result, not an error.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        command: Command,
    ) -> Pin<Box<dyn Future<Output = Result<CommandResult>> + Send + '_>>;
}

/// Real executor backend used in production: one child process per command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ProcessExecutor {
    fn execute(
        &self,
        command: Command,
    ) -> Pin<Box<dyn Future<Output = Result<CommandResult>> + Send + '_>> {
        Box::pin(super::process::run_command(command))
    }
}
