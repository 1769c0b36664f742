use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use devpilot::exec::{CommandOutput, ProcessRunner};
use devpilot::queue::QueueObserver;
use devpilot::types::ItemRef;
use devpilot::worker::Reporter;

/// A fake process runner that:
/// - records every command line it is asked to run
/// - answers from a table of substring-matched canned responses
/// - defaults to exit code 0 with empty output when nothing matches.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: Mutex<Vec<(String, CommandOutput)>>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response for any command whose joined token string
    /// contains `needle`. Earlier registrations win.
    pub fn respond(&self, needle: &str, exit_code: i32, stdout: &str, stderr: &str) {
        self.responses.lock().unwrap().push((
            needle.to_string(),
            CommandOutput {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
    }

    /// Every command line run so far, in order.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// Number of recorded invocations whose joined token string contains
    /// `needle`.
    pub fn invocation_count(&self, needle: &str) -> usize {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|cmd| cmd.join(" ").contains(needle))
            .count()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        command: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = CommandOutput> + Send + '_>> {
        let joined = command.join(" ");
        self.invocations.lock().unwrap().push(command);

        let output = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| joined.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();

        Box::pin(async move { output })
    }
}

/// Reporter that records every surfaced task report.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, bool, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, bool, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn task_finished(&self, task_name: &str, success: bool, report: &str) {
        self.reports.lock().unwrap().push((
            task_name.to_string(),
            success,
            report.to_string(),
        ));
    }
}

/// Queue observer that records every counter notification.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    sizes: Mutex<Vec<usize>>,
    item_counts: Mutex<Vec<(String, usize)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue sizes in notification order.
    pub fn sizes(&self) -> Vec<usize> {
        self.sizes.lock().unwrap().clone()
    }

    /// Per-item counts in notification order, keyed by the item's display
    /// form.
    pub fn item_counts(&self) -> Vec<(String, usize)> {
        self.item_counts.lock().unwrap().clone()
    }
}

impl QueueObserver for RecordingObserver {
    fn queue_size_changed(&self, remaining: usize) {
        self.sizes.lock().unwrap().push(remaining);
    }

    fn item_count_changed(&self, item: &ItemRef, count: usize) {
        self.item_counts
            .lock()
            .unwrap()
            .push((item.to_string(), count));
    }
}
