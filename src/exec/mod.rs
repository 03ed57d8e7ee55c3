// src/exec/mod.rs

//! Execution layer.
//!
//! - [`backend`] provides the `Executor` trait and the `ProcessExecutor` used
//!   in production; tests swap in a fake implementation.
//! - [`process`] runs one command as a child process using
//!   `tokio::process::Command` and captures its output.
//! - [`engine`] drives every (config, action) pair through the resumable
//!   step protocol, sequentially or on a bounded worker pool.
//! - [`report`] holds the aggregated results and the exit-status policy.

pub mod backend;
pub mod engine;
pub mod process;
pub mod report;

pub use backend::{Executor, ProcessExecutor};
pub use engine::{ExecutionEngine, drive};
pub use report::{ActionRun, RunOutcome, RunReport};
