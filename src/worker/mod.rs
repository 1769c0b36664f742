// src/worker/mod.rs

//! The single background task worker.
//!
//! Exactly one worker drains the queue, which gives the whole subsystem its
//! central invariant: at most one external tool invocation runs at a time.
//! The wrapped vendor tools are not safe for concurrent use and device
//! channels are serialized by the vendor's own tooling, so the worker
//! blocking on a subprocess is the rate limiter, not a bug.
//!
//! - [`report`] defines the presentation seam task reports are handed to.

pub mod report;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::ops::{self, TaskContext};
use crate::queue::{Task, TaskQueue, WakeReceiver};

pub use report::{LogReporter, Reporter};

/// Options for the worker loop.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    /// Exit the loop once the queue is drained instead of going back to
    /// sleep. Used by one-shot front-ends.
    pub exit_when_idle: bool,
}

/// Worker state: sleeps until woken, then drains the queue task by task.
pub struct TaskWorker {
    queue: Arc<TaskQueue>,
    wake_rx: WakeReceiver,
    ctx: TaskContext,
    reporter: Arc<dyn Reporter>,
    options: WorkerOptions,
}

impl TaskWorker {
    /// Spawn the worker onto the runtime. It runs until the wake channel
    /// closes, or (with `exit_when_idle`) until the queue runs dry.
    pub fn spawn(
        queue: Arc<TaskQueue>,
        wake_rx: WakeReceiver,
        ctx: TaskContext,
        reporter: Arc<dyn Reporter>,
        options: WorkerOptions,
    ) -> JoinHandle<()> {
        let worker = Self {
            queue,
            wake_rx,
            ctx,
            reporter,
            options,
        };
        tokio::spawn(worker.run())
    }

    async fn run(mut self) {
        info!("task worker started");

        loop {
            // Idle until a producer signals new work. A closed channel means
            // the queue itself is gone.
            if self.wake_rx.recv().await.is_none() {
                break;
            }

            // Drain: keep asking for the oldest unclaimed task until none
            // remain. Handlers may enqueue follow-up tasks mid-drain; those
            // are picked up in the same pass.
            while let Some(task) = self.queue.next_task() {
                self.process(task).await;
            }

            if self.options.exit_when_idle && !self.queue.has_tasks() {
                break;
            }
        }

        info!("task worker finished");
    }

    /// Run one claimed task to completion and retire it from the queue.
    async fn process(&self, task: Arc<Task>) {
        debug!(task = task.name(), "task claimed");
        task.set_active(true);

        let outcome = ops::dispatch(&self.ctx, &task).await;

        task.set_successful(outcome.success);
        if let Some(report) = outcome.report {
            task.set_report(report);
        }

        // A task that fails without a report is only visible through its
        // status flags; diagnostic text lives in the logs.
        if let Some(report) = task.report() {
            self.reporter
                .task_finished(task.name(), task.is_successful(), &report);
        }

        task.set_active(false);
        task.set_completed(true);
        self.queue.remove_task(&task);

        debug!(
            task = task.name(),
            successful = task.is_successful(),
            "task retired"
        );
    }
}
