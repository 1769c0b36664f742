// src/queue/task.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::types::{DeviceId, ItemRef};

/// The closed set of operations the worker knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    ProjectReveal,
    ProjectLintScan,
    ProjectPackage,
    ProjectInstall,
    ProjectLaunch,
    ProjectClose,
    ProjectUninstall,
    ProjectRun,
    ProjectNew,
    ProjectNewScene,
    ProjectOpenLogger,
    ProjectDeploy,
    ProjectOpenInBrowser,
    ResourceMonitor,
    OpenWebkitBrowser,
    DeviceStart,
    DeviceReveal,
    DeviceEnableHostMode,
    DeviceScan,
    DeviceListApps,
    DeviceSetLogLevel,
}

impl TaskKind {
    /// Human readable task name, used in notifications and logs.
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::ProjectReveal => "Reveal Project in Finder",
            TaskKind::ProjectLintScan => "Analyse Project with JSLint",
            TaskKind::ProjectNew => "Create New Project",
            TaskKind::ProjectNewScene => "Add New Scene",
            TaskKind::ProjectDeploy => "Deploy Project",
            TaskKind::ProjectPackage => "Package Project",
            TaskKind::ProjectInstall => "Install Project",
            TaskKind::ProjectLaunch => "Launch Project",
            TaskKind::ProjectClose => "Close Project",
            TaskKind::ProjectUninstall => "Uninstall Project",
            TaskKind::ProjectRun => "Run Project",
            TaskKind::ProjectOpenLogger => "Open Palm-Log",
            TaskKind::ProjectOpenInBrowser => "Open Project in Browser",
            TaskKind::ResourceMonitor => "Open Resource Monitor",
            TaskKind::OpenWebkitBrowser => "Open WebKit Browser",
            TaskKind::DeviceScan => "Scan For Devices",
            TaskKind::DeviceReveal => "Reveal Device in Finder",
            TaskKind::DeviceListApps => "List Apps for Device",
            TaskKind::DeviceStart => "Start Device",
            TaskKind::DeviceEnableHostMode => "Enable Host Mode",
            TaskKind::DeviceSetLogLevel => "Set Device Log Level",
        }
    }
}

/// One unit of work: which operation to perform, on which project or device,
/// with which extra arguments.
///
/// Identity and payload are fixed at construction; the outcome fields are
/// written only by the worker, after it has claimed the task. Other threads
/// (UI counters, callers polling status) may read them at any time and can
/// observe slightly stale values; that is tolerated, so the flags use
/// relaxed atomics rather than a lock.
#[derive(Debug)]
pub struct Task {
    kind: TaskKind,
    source: Option<ItemRef>,
    destination: Option<DeviceId>,
    arguments: Vec<String>,

    active: AtomicBool,
    completed: AtomicBool,
    successful: AtomicBool,
    report: Mutex<Option<String>>,
}

impl Task {
    pub fn new(kind: TaskKind, source: Option<ItemRef>, destination: Option<DeviceId>) -> Self {
        Self::with_arguments(kind, source, destination, Vec::new())
    }

    pub fn with_arguments(
        kind: TaskKind,
        source: Option<ItemRef>,
        destination: Option<DeviceId>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            kind,
            source,
            destination,
            arguments,
            active: AtomicBool::new(false),
            completed: AtomicBool::new(false),
            successful: AtomicBool::new(false),
            report: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The project or device that is the subject of the operation.
    pub fn source_item(&self) -> Option<&ItemRef> {
        self.source.as_ref()
    }

    /// The device the operation targets (install destination, launch
    /// target). Absent for source-only operations.
    pub fn destination_device(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn set_active(&self, state: bool) {
        self.active.store(state, Ordering::Relaxed);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn set_completed(&self, state: bool) {
        self.completed.store(state, Ordering::Relaxed);
    }

    /// Only meaningful once `is_completed()` returns true.
    pub fn is_successful(&self) -> bool {
        self.successful.load(Ordering::Relaxed)
    }

    pub fn set_successful(&self, state: bool) {
        self.successful.store(state, Ordering::Relaxed);
    }

    pub fn has_report(&self) -> bool {
        self.report.lock().unwrap().is_some()
    }

    /// Human readable explanation of the outcome, when the operation had
    /// something to say beyond the success flag.
    pub fn report(&self) -> Option<String> {
        self.report.lock().unwrap().clone()
    }

    pub fn set_report(&self, report: impl Into<String>) {
        *self.report.lock().unwrap() = Some(report.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_fields_start_cleared() {
        let task = Task::new(TaskKind::ProjectPackage, None, None);
        assert!(!task.is_active());
        assert!(!task.is_completed());
        assert!(!task.is_successful());
        assert!(!task.has_report());
        assert!(task.report().is_none());
    }

    #[test]
    fn arguments_are_positional() {
        let task = Task::with_arguments(
            TaskKind::ProjectNew,
            None,
            None,
            vec!["/projects".to_string(), "Ticker".to_string()],
        );
        assert_eq!(task.argument(0), Some("/projects"));
        assert_eq!(task.argument(1), Some("Ticker"));
        assert_eq!(task.argument(2), None);
    }
}
