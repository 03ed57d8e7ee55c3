// src/exec/process.rs

//! Individual command process runner.

use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command as ProcessCommand;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::model::{Command, CommandResult};

/// Exit code recorded when a process could not be started or was killed by a
/// signal.
pub const ABNORMAL_EXIT: i32 = -1;

/// Run `command` to completion, capturing stdout and stderr.
///
/// - A process that cannot be spawned (missing program, permissions...) is
///   reported as a result with exit code [`ABNORMAL_EXIT`] and the spawn
///   error as stderr; the action logic decides what to do with it.
/// - The child is killed if the returned future is dropped (interrupt, or an
///   aborted worker).
pub async fn run_command(command: Command) -> Result<CommandResult> {
    info!(
        config = %command.config(),
        argv = ?command.argv(),
        shell = command.shell(),
        "starting command"
    );

    let Some(mut cmd) = build_process(&command) else {
        let message = "cannot run an empty command line".to_string();
        error!(config = %command.config(), "{message}");
        return Ok(CommandResult::new(command, ABNORMAL_EXIT, Vec::new(), message.into_bytes()));
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(
                config = %command.config(),
                argv = ?command.argv(),
                error = %err,
                "failed to spawn command process"
            );
            let message = format!("failed to spawn '{}': {err}", command.command_line());
            return Ok(CommandResult::new(command, ABNORMAL_EXIT, Vec::new(), message.into_bytes()));
        }
    };

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for process of command '{}'", command.command_line()))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!(config = %command.config(), "stdout: {}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(config = %command.config(), "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(ABNORMAL_EXIT);
    let result = CommandResult::new(command, code, output.stdout, output.stderr);

    info!(
        config = %result.command.config(),
        argv = ?result.command.argv(),
        exit_code = code,
        success = result.success(),
        "command process exited"
    );

    Ok(result)
}

/// Build the OS process for `command`, or `None` for an empty argv.
fn build_process(command: &Command) -> Option<ProcessCommand> {
    if command.shell() {
        // Build a shell command appropriate for the platform.
        let line = command.command_line();
        return Some(if cfg!(windows) {
            let mut c = ProcessCommand::new("cmd");
            c.arg("/C").arg(line);
            c
        } else {
            let mut c = ProcessCommand::new("sh");
            c.arg("-c").arg(line);
            c
        });
    }

    let (program, args) = command.argv().split_first()?;
    let mut c = ProcessCommand::new(program);
    c.args(args);
    Some(c)
}
