use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use matrix_runner::errors::Result;
use matrix_runner::{Command, CommandResult, Executor};

type ExitRule = dyn Fn(&Command) -> i32 + Send + Sync;
type DelayRule = dyn Fn(&Command) -> Duration + Send + Sync;

/// A fake executor that:
/// - records every command it was asked to run, in call order
/// - answers with an exit code chosen by a rule (0 by default)
/// - echoes the command line as stdout
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<Command>>>,
    exit_code: Arc<ExitRule>,
    delay: Option<Arc<DelayRule>>,
}

impl FakeExecutor {
    pub fn new(executed: Arc<Mutex<Vec<Command>>>) -> Self {
        Self {
            executed,
            exit_code: Arc::new(|_| 0),
            delay: None,
        }
    }

    pub fn with_exit_codes<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Command) -> i32 + Send + Sync + 'static,
    {
        self.exit_code = Arc::new(rule);
        self
    }

    /// Sleep before answering, to shuffle completion order in parallel runs.
    pub fn with_delay<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Command) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Arc::new(rule));
        self
    }
}

impl Executor for FakeExecutor {
    fn execute(
        &self,
        command: Command,
    ) -> Pin<Box<dyn Future<Output = Result<CommandResult>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let code = (self.exit_code)(&command);
        let delay = self.delay.as_ref().map(|rule| rule(&command));

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            {
                let mut guard = executed.lock().unwrap();
                guard.push(command.clone());
            }
            let stdout = format!("{}\n", command.command_line()).into_bytes();
            Ok(CommandResult::new(command, code, stdout, Vec::new()))
        })
    }
}
