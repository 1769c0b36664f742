// src/worker/report.rs

use tracing::{info, warn};

/// Presentation seam for task reports.
///
/// Every completed task with a non-empty report is handed here, successful
/// or not. How the report reaches the user (dialog, console, status line) is
/// the implementation's business.
pub trait Reporter: Send + Sync {
    fn task_finished(&self, task_name: &str, success: bool, report: &str);
}

/// Reporter that writes reports to the log, used by the CLI front-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn task_finished(&self, task_name: &str, success: bool, report: &str) {
        if success {
            info!(task = task_name, "{report}");
        } else {
            warn!(task = task_name, "{report}");
        }
    }
}
