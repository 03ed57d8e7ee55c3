// src/exec/engine.rs

//! Drives actions over configs.
//!
//! For every eligible config and every selected action the engine starts the
//! action's logic, executes each command it yields through the
//! [`Executor`], and resumes the logic with the accumulated results until it
//! reports completion.
//!
//! Ordering:
//! - sequential mode (`jobs == 1`) runs configs in enumeration order and,
//!   within a config, actions in the order given (registration order);
//! - with `jobs > 1` up to `jobs` pairs run concurrently on Tokio tasks; each
//!   pair's commands stay strictly ordered and the report is reassembled in
//!   the sequential order.
//!
//! The first error (action logic failure, executor failure) aborts the whole
//! invocation; in-flight workers are aborted, which kills their processes.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::errors::{MatrixError, Result};
use crate::exec::backend::Executor;
use crate::exec::report::{ActionRun, RunReport};
use crate::model::{Action, Config, Step};

/// Run one action for one config to completion.
pub async fn drive(executor: &dyn Executor, config: &Config, action: &Action) -> Result<ActionRun> {
    let logic_error = |source: anyhow::Error| MatrixError::Action {
        action: action.name().to_string(),
        config: config.to_string(),
        source,
    };

    debug!(action = %action.name(), config = %config, "starting action");

    let mut sequence = action.start(config).map_err(logic_error)?;
    let mut results = Vec::new();

    loop {
        match sequence.resume(&results).map_err(logic_error)? {
            Step::Run(command) => {
                if command.argv().is_empty() {
                    return Err(MatrixError::EmptyCommand {
                        action: action.name().to_string(),
                        config: config.to_string(),
                    });
                }
                let result = executor.execute(command).await?;
                results.push(result);
            }
            Step::Done => break,
        }
    }

    let run = ActionRun {
        config: config.clone(),
        action: action.name().to_string(),
        results,
    };
    info!(
        action = %run.action,
        config = %run.config,
        commands = run.results.len(),
        outcome = %run.outcome(),
        "action finished"
    );
    Ok(run)
}

/// Executes the (config, action) pairs of an invocation.
pub struct ExecutionEngine {
    executor: Arc<dyn Executor>,
    jobs: usize,
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl ExecutionEngine {
    /// `jobs` is clamped to at least 1.
    pub fn new(executor: Arc<dyn Executor>, jobs: usize) -> Self {
        Self {
            executor,
            jobs: jobs.max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub async fn run(&self, configs: &[Config], actions: &[Action]) -> Result<RunReport> {
        info!(
            configs = configs.len(),
            actions = actions.len(),
            jobs = self.jobs,
            "executing matrix"
        );

        if self.jobs == 1 {
            self.run_sequential(configs, actions).await
        } else {
            self.run_parallel(configs, actions).await
        }
    }

    async fn run_sequential(&self, configs: &[Config], actions: &[Action]) -> Result<RunReport> {
        let mut runs = Vec::with_capacity(configs.len() * actions.len());
        for config in configs {
            for action in actions {
                runs.push(drive(self.executor.as_ref(), config, action).await?);
            }
        }
        Ok(RunReport::new(runs))
    }

    async fn run_parallel(&self, configs: &[Config], actions: &[Action]) -> Result<RunReport> {
        let permits = Arc::new(Semaphore::new(self.jobs));
        let mut workers = JoinSet::new();

        let pairs = configs
            .iter()
            .flat_map(|config| actions.iter().map(move |action| (config.clone(), action.clone())));
        let mut total = 0;
        for (index, (config, action)) in pairs.enumerate() {
            total += 1;
            let executor = Arc::clone(&self.executor);
            let permits = Arc::clone(&permits);
            workers.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| MatrixError::Other(anyhow::Error::new(e)))?;
                let run = drive(executor.as_ref(), &config, &action).await?;
                Ok::<_, MatrixError>((index, run))
            });
        }

        let mut slots: Vec<Option<ActionRun>> = (0..total).map(|_| None).collect();
        while let Some(joined) = workers.join_next().await {
            // Returning early drops `workers`, aborting the remaining tasks.
            let (index, run) = joined.map_err(|e| MatrixError::Other(anyhow::Error::new(e)))??;
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(run);
            }
        }

        Ok(RunReport::new(slots.into_iter().flatten().collect()))
    }
}
