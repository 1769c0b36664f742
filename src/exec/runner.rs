// src/exec/runner.rs

//! Pluggable process runner abstraction.
//!
//! The worker and the task handlers talk to a `ProcessRunner` instead of
//! spawning processes directly. This makes it easy to swap in a fake runner
//! in tests while keeping the production implementation here.
//!
//! Running a command **blocks the single task worker** for the duration of
//! the process. That is intentional backpressure: the wrapped vendor tools
//! are not safe for concurrent invocation, so while one task's subprocess
//! runs, no other task starts.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, error, info};

/// Exit code reported when the process could not be spawned or waited on
/// at all. Real tool failures use their own non-zero codes (usually 1).
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 2;

/// Captured result of one external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Output for a command that never ran.
    pub fn spawn_failure() -> Self {
        Self {
            exit_code: SPAWN_FAILURE_EXIT_CODE,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Trait abstracting how external commands are executed.
///
/// Implementations never fail to the caller: any spawn or IO problem is
/// logged and converted into a [`CommandOutput`] with the sentinel exit code
/// [`SPAWN_FAILURE_EXIT_CODE`]. Retry policy, if any, belongs to the calling
/// handler.
pub trait ProcessRunner: Send + Sync {
    /// Run the given command tokens and wait for the process to exit.
    fn run(
        &self,
        command: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = CommandOutput> + Send + '_>>;
}

/// Real process runner used in production.
#[derive(Debug, Clone, Default)]
pub struct RealProcessRunner;

impl ProcessRunner for RealProcessRunner {
    fn run(
        &self,
        command: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = CommandOutput> + Send + '_>> {
        Box::pin(async move {
            let Some((program, args)) = command.split_first() else {
                error!("refusing to run an empty command line");
                return CommandOutput::spawn_failure();
            };

            info!(cmd = %command.join(" "), "running external command");

            let output = Command::new(program)
                .args(args)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await;

            match output {
                Ok(output) => {
                    let result = CommandOutput {
                        // A signal-terminated process has no exit code; fold
                        // it into the sentinel like any other spawn trouble.
                        exit_code: output.status.code().unwrap_or(SPAWN_FAILURE_EXIT_CODE),
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    };
                    debug!(
                        exit_code = result.exit_code,
                        stdout = %result.stdout,
                        stderr = %result.stderr,
                        "external command finished"
                    );
                    result
                }
                Err(err) => {
                    error!(cmd = %command.join(" "), error = %err, "failed to run command");
                    CommandOutput::spawn_failure()
                }
            }
        })
    }
}

/// Run a command in a detached Tokio task, discarding its result.
///
/// Used for companion processes the queue must not wait on: the resource
/// monitor, the log-tail stream, and the host-mode SSH tunnel only return
/// when the user closes them.
pub fn spawn_detached(runner: Arc<dyn ProcessRunner>, command: Vec<String>) {
    tokio::spawn(async move {
        let output = runner.run(command).await;
        debug!(exit_code = output.exit_code, "detached command finished");
    });
}
