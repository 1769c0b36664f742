// src/ops/mod.rs

//! Operation handlers for the task worker.
//!
//! Each task kind maps to one handler routine that checks its preconditions,
//! builds the vendor command line, runs it through the [`ProcessRunner`],
//! and interprets the result. Handlers never panic across the dispatch
//! boundary and never return `Err`: every way a handler can go wrong is
//! expressed as an [`Outcome`] with a success flag and an optional
//! user-facing report.
//!
//! - [`project`] holds the per-project operations (package, install, launch,
//!   deploy, the `run` composite, project creation).
//! - [`device`] holds device management (scan, app listing, host mode).
//! - [`tools`] holds companion-process launchers (resource monitor, log
//!   tail, desktop opener, browsers).

pub mod device;
pub mod project;
pub mod tools;

use std::sync::Arc;

use tracing::warn;

use crate::config::ToolsSection;
use crate::exec::{ProcessRunner, SdkTools};
use crate::fs::FileSystem;
use crate::queue::{Task, TaskKind, TaskQueue};
use crate::types::ItemRef;
use crate::workspace::{Device, Project, Workspace};

/// Everything a handler may touch, passed in explicitly instead of living in
/// ambient globals.
#[derive(Clone)]
pub struct TaskContext {
    pub workspace: Arc<Workspace>,
    pub queue: Arc<TaskQueue>,
    pub sdk: SdkTools,
    pub tools: ToolsSection,
    pub fs: Arc<dyn FileSystem>,
    pub runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("sdk", &self.sdk)
            .finish_non_exhaustive()
    }
}

/// Result of one handler invocation.
///
/// A failed outcome without a report is deliberate: the failure is visible
/// only through the task status, and diagnostic text stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub report: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            report: None,
        }
    }

    /// Success that still has something to tell the user.
    pub fn ok_with(report: impl Into<String>) -> Self {
        Self {
            success: true,
            report: Some(report.into()),
        }
    }

    pub fn fail(report: impl Into<String>) -> Self {
        Self {
            success: false,
            report: Some(report.into()),
        }
    }

    /// Failure whose details are only useful in the logs.
    pub fn fail_silent() -> Self {
        Self {
            success: false,
            report: None,
        }
    }
}

/// Look up the handler for the task's kind and run it.
pub async fn dispatch(ctx: &TaskContext, task: &Task) -> Outcome {
    match task.kind() {
        TaskKind::ProjectReveal => project::reveal(ctx, task).await,
        TaskKind::ProjectLintScan => project::lint_scan(ctx, task).await,
        TaskKind::ProjectNew => project::new_project(ctx, task).await,
        TaskKind::ProjectNewScene => project::new_scene(ctx, task).await,
        TaskKind::ProjectDeploy => project::deploy(ctx, task).await,
        TaskKind::ProjectPackage => project::package(ctx, task).await,
        TaskKind::ProjectInstall => project::install(ctx, task).await,
        TaskKind::ProjectLaunch => project::launch(ctx, task, false).await,
        TaskKind::ProjectClose => project::launch(ctx, task, true).await,
        TaskKind::ProjectUninstall => project::uninstall(ctx, task).await,
        TaskKind::ProjectRun => project::run_all(ctx, task).await,
        TaskKind::ProjectOpenLogger => tools::log_tail(ctx, task).await,
        TaskKind::ProjectOpenInBrowser => project::open_in_browser(ctx, task).await,
        TaskKind::ResourceMonitor => tools::resource_monitor(ctx, task).await,
        TaskKind::OpenWebkitBrowser => tools::open_webkit_browser(ctx, task).await,
        TaskKind::DeviceScan => device::scan(ctx, task).await,
        TaskKind::DeviceReveal => device::placeholder(ctx, task).await,
        TaskKind::DeviceListApps => device::list_apps(ctx, task).await,
        TaskKind::DeviceStart => device::start(ctx, task).await,
        TaskKind::DeviceEnableHostMode => device::enable_host_mode(ctx, task).await,
        TaskKind::DeviceSetLogLevel => device::set_log_level(ctx, task).await,
    }
}

/// Snapshot of the task's subject project, without touching the disk.
pub(crate) fn project_for(ctx: &TaskContext, task: &Task) -> Option<Project> {
    let Some(ItemRef::Project(key)) = task.source_item() else {
        warn!(task = task.name(), "task has no project subject");
        return None;
    };
    let project = ctx.workspace.project_snapshot(key);
    if project.is_none() {
        warn!(task = task.name(), key, "subject project is not open");
    }
    project
}

/// Subject project with metadata re-read from its backing files, so the
/// operation works on what is really on disk.
pub(crate) fn refreshed_project_for(ctx: &TaskContext, task: &Task) -> Option<Project> {
    let Some(ItemRef::Project(key)) = task.source_item() else {
        warn!(task = task.name(), "task has no project subject");
        return None;
    };
    let project = ctx.workspace.refresh_project(&*ctx.fs, key);
    if project.is_none() {
        warn!(task = task.name(), key, "subject project is not open");
    }
    project
}

/// The destination device, if it is currently reachable. The offline
/// emulator and devices missing from the latest scan yield `None`.
pub(crate) fn available_destination(ctx: &TaskContext, task: &Task) -> Option<Device> {
    let key = task.destination_device()?;
    let device = ctx.workspace.find_device(key)?;
    if ctx.workspace.is_device_available(device.id()) {
        Some(device)
    } else {
        None
    }
}

/// The destination device id for operations that do not care about
/// availability: resolved through the registry when possible, the raw task
/// value otherwise.
pub(crate) fn destination_id(ctx: &TaskContext, task: &Task) -> Option<String> {
    let key = task.destination_device()?;
    Some(
        ctx.workspace
            .find_device(key)
            .map(|d| d.id().to_string())
            .unwrap_or_else(|| key.to_string()),
    )
}
