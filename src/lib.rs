// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod ops;
pub mod queue;
pub mod types;
pub mod worker;
pub mod workspace;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::exec::{ProcessRunner, RealProcessRunner, SdkTools};
use crate::fs::{FileSystem, RealFileSystem};
use crate::ops::TaskContext;
use crate::queue::{LogObserver, Task, TaskKind, TaskQueue};
use crate::types::ItemRef;
use crate::worker::{LogReporter, TaskWorker, WorkerOptions};
use crate::workspace::Workspace;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the workspace (device and project registries)
/// - the task queue and its single worker
/// - the real process runner
///
/// and then submits the tasks the subcommand asks for, draining the queue
/// once.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::load_or_default(&args.config)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let runner: Arc<dyn ProcessRunner> = Arc::new(RealProcessRunner);

    let workspace = Arc::new(Workspace::new());
    workspace.seed_emulator();

    let (queue, wake_rx) = TaskQueue::new(Box::new(LogObserver));

    let ctx = TaskContext {
        workspace: Arc::clone(&workspace),
        queue: Arc::clone(&queue),
        sdk: SdkTools::from_config(&cfg.sdk),
        tools: cfg.tools.clone(),
        fs: Arc::clone(&fs),
        runner,
    };

    let tasks = build_tasks(&args.command, &workspace, &*fs)?;
    for task in &tasks {
        queue.add_task(Arc::clone(task));
    }

    let handle = TaskWorker::spawn(
        Arc::clone(&queue),
        wake_rx,
        ctx,
        Arc::new(LogReporter),
        WorkerOptions {
            exit_when_idle: true,
        },
    );
    handle.await.context("task worker panicked")?;

    let failed: Vec<&str> = tasks
        .iter()
        .filter(|t| !t.is_successful())
        .map(|t| t.name())
        .collect();
    if !failed.is_empty() {
        anyhow::bail!("failed: {}", failed.join(", "));
    }

    info!("all tasks completed");
    Ok(())
}

/// Translate the subcommand into the task(s) to submit.
///
/// Device-targeted operations are preceded by a device scan so the
/// availability checks inside the handlers run against a fresh registry,
/// matching the way the interactive front-end scans on startup.
fn build_tasks(
    command: &Command,
    workspace: &Workspace,
    fs: &dyn FileSystem,
) -> Result<Vec<Arc<Task>>> {
    let mut tasks = Vec::new();

    let project_ref = |location: &str| -> Result<ItemRef> {
        let key = workspace.open_project(fs, location)?;
        Ok(ItemRef::Project(key))
    };
    let scan = || Arc::new(Task::new(TaskKind::DeviceScan, None, None));

    match command {
        Command::Scan => {
            tasks.push(scan());
        }
        Command::Package { project } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::new(TaskKind::ProjectPackage, Some(item), None)));
        }
        Command::Deploy { project } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::new(TaskKind::ProjectDeploy, Some(item), None)));
        }
        Command::Install { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectInstall,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::Launch { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectLaunch,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::Close { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectClose,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::Uninstall { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectUninstall,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::Run { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectRun,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::New { destination, name } => {
            tasks.push(Arc::new(Task::with_arguments(
                TaskKind::ProjectNew,
                None,
                None,
                vec![destination.clone(), name.clone()],
            )));
        }
        Command::NewScene { project, name } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::with_arguments(
                TaskKind::ProjectNewScene,
                Some(item),
                None,
                vec![name.clone()],
            )));
        }
        Command::Reveal { project } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::new(TaskKind::ProjectReveal, Some(item), None)));
        }
        Command::Lint { project } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectLintScan,
                Some(item),
                None,
            )));
        }
        Command::Open { project } => {
            let item = project_ref(project)?;
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectOpenInBrowser,
                Some(item),
                None,
            )));
        }
        Command::Apps { device } => {
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::DeviceListApps,
                None,
                Some(device.clone()),
            )));
        }
        Command::Start { device } => {
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::DeviceStart,
                None,
                Some(device.clone()),
            )));
        }
        Command::HostMode { device } => {
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::DeviceEnableHostMode,
                None,
                Some(device.clone()),
            )));
        }
        Command::SetLogLevel { level, device } => {
            tasks.push(scan());
            tasks.push(Arc::new(Task::with_arguments(
                TaskKind::DeviceSetLogLevel,
                None,
                Some(device.clone()),
                vec![level.clone()],
            )));
        }
        Command::Log { project, device } => {
            let item = project_ref(project)?;
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ProjectOpenLogger,
                Some(item),
                Some(device.clone()),
            )));
        }
        Command::Monitor { device, project } => {
            let item = match project {
                Some(location) => Some(project_ref(location)?),
                None => None,
            };
            tasks.push(scan());
            tasks.push(Arc::new(Task::new(
                TaskKind::ResourceMonitor,
                item,
                Some(device.clone()),
            )));
        }
        Command::Browser { choice } => {
            let arguments = choice.iter().cloned().collect();
            tasks.push(Arc::new(Task::with_arguments(
                TaskKind::OpenWebkitBrowser,
                None,
                None,
                arguments,
            )));
        }
    }

    Ok(tasks)
}
