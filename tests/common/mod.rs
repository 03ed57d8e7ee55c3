#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use matrix_runner::Command;

pub use matrix_runner_test_utils::builders;
pub use matrix_runner_test_utils::fake_executor::FakeExecutor;
pub use matrix_runner_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Shared log of the commands a [`FakeExecutor`] ran.
pub fn command_log() -> Arc<Mutex<Vec<Command>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// First argv element of every logged command, in execution order.
pub fn programs(log: &Arc<Mutex<Vec<Command>>>) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .map(|c| c.argv().first().cloned().unwrap_or_default())
        .collect()
}
