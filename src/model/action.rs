// src/model/action.rs

//! Actions and the resumable command protocol.
//!
//! An action's logic is started once per config and then driven step by step
//! by the execution engine:
//!
//! 1. [`ActionLogic::start`] creates a fresh [`CommandSequence`] for a config.
//! 2. The engine calls [`CommandSequence::resume`] with every result produced
//!    so far in this run (empty on the first call).
//! 3. The sequence answers [`Step::Run`] with the next command, or
//!    [`Step::Done`]. After a `Run`, the engine executes the command and
//!    resumes the sequence again with the new result appended.
//!
//! The sequence is never resumed while one of its commands is still running.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::model::command::{Command, CommandResult};
use crate::model::config::Config;

/// What a command sequence wants to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Run(Command),
    Done,
}

/// Suspended action logic for one config.
pub trait CommandSequence: Send {
    /// Produce the next step, given all results of this run so far.
    fn resume(&mut self, results: &[CommandResult]) -> anyhow::Result<Step>;
}

impl CommandSequence for Box<dyn CommandSequence> {
    fn resume(&mut self, results: &[CommandResult]) -> anyhow::Result<Step> {
        (**self).resume(results)
    }
}

/// Factory of command sequences; shared read-only between workers.
pub trait ActionLogic: Send + Sync {
    fn start(&self, config: &Config) -> anyhow::Result<Box<dyn CommandSequence>>;
}

/// A named, registered unit of work.
#[derive(Clone)]
pub struct Action {
    name: String,
    desc: String,
    logic: Arc<dyn ActionLogic>,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.logic, &other.logic)
    }
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        desc: impl Into<String>,
        logic: impl ActionLogic + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            logic: Arc::new(logic),
        }
    }

    /// Build an action from a closure that starts a sequence for a config.
    pub fn from_fn<F, S>(name: impl Into<String>, desc: impl Into<String>, start: F) -> Self
    where
        F: Fn(&Config) -> S + Send + Sync + 'static,
        S: CommandSequence + 'static,
    {
        Self::new(name, desc, FnLogic(start))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn start(&self, config: &Config) -> anyhow::Result<Box<dyn CommandSequence>> {
        self.logic.start(config)
    }
}

struct FnLogic<F>(F);

impl<F, S> ActionLogic for FnLogic<F>
where
    F: Fn(&Config) -> S + Send + Sync,
    S: CommandSequence + 'static,
{
    fn start(&self, config: &Config) -> anyhow::Result<Box<dyn CommandSequence>> {
        Ok(Box::new((self.0)(config)))
    }
}

/// Command sequence driven by a closure.
///
/// The closure keeps its own state between calls (it is `FnMut`), which makes
/// small branching actions easy to write inline.
pub struct FnSequence<F>(F);

/// Wrap a step closure into a [`CommandSequence`].
pub fn steps<F>(step: F) -> FnSequence<F>
where
    F: FnMut(&[CommandResult]) -> anyhow::Result<Step> + Send,
{
    FnSequence(step)
}

impl<F> CommandSequence for FnSequence<F>
where
    F: FnMut(&[CommandResult]) -> anyhow::Result<Step> + Send,
{
    fn resume(&mut self, results: &[CommandResult]) -> anyhow::Result<Step> {
        (self.0)(results)
    }
}

/// A fixed list of commands, yielded in order.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pending: VecDeque<Command>,
    halt_on_failure: bool,
}

impl Sequence {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            pending: commands.into_iter().collect(),
            halt_on_failure: false,
        }
    }

    /// A sequence that yields nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stop as soon as a command's result is not successful.
    pub fn halt_on_failure(mut self) -> Self {
        self.halt_on_failure = true;
        self
    }
}

impl CommandSequence for Sequence {
    fn resume(&mut self, results: &[CommandResult]) -> anyhow::Result<Step> {
        if self.halt_on_failure && results.last().is_some_and(|r| !r.success()) {
            self.pending.clear();
        }
        Ok(match self.pending.pop_front() {
            Some(command) => Step::Run(command),
            None => Step::Done,
        })
    }
}
