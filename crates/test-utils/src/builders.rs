#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use devpilot::config::{SdkSection, ToolsSection};
use devpilot::exec::SdkTools;
use devpilot::fs::{FileSystem, RealFileSystem};
use devpilot::ops::TaskContext;
use devpilot::queue::{QueueObserver, TaskQueue, WakeReceiver};
use devpilot::worker::{Reporter, TaskWorker, WorkerOptions};
use devpilot::workspace::Workspace;

use crate::fake_runner::{FakeRunner, RecordingObserver, RecordingReporter};

/// Write a minimal valid Mojo project folder under `root`.
///
/// Layout: `app_src/` with `appinfo.json` and `sources.json`, plus an empty
/// `bin/`.
pub fn write_mojo_project(root: &Path, id: &str, version: &str, title: &str) {
    std::fs::create_dir_all(root.join("app_src")).expect("creating app_src");
    std::fs::create_dir_all(root.join("bin")).expect("creating bin");
    std::fs::write(
        root.join("app_src/appinfo.json"),
        format!(
            r#"{{"id": "{id}", "version": "{version}", "title": "{title}", "main": "index.html"}}"#
        ),
    )
    .expect("writing appinfo.json");
    std::fs::write(
        root.join("app_src/sources.json"),
        r#"[{"source": "app\/assistants\/main-assistant.js"}]"#,
    )
    .expect("writing sources.json");
}

/// Upgrade a project folder written by [`write_mojo_project`] to an Enyo 2
/// layout: `depends.js` plus a deploy script.
pub fn make_enyo2_project(root: &Path) {
    std::fs::remove_file(root.join("app_src/sources.json")).ok();
    std::fs::write(
        root.join("app_src/depends.js"),
        r#"enyo.depends("app.js");"#,
    )
    .expect("writing depends.js");
    std::fs::create_dir_all(root.join("app_src/tools")).expect("creating tools dir");
    std::fs::write(root.join("app_src/tools/deploy.sh"), "#!/bin/sh\n")
        .expect("writing deploy.sh");
}

/// Fully wired queue + context for integration tests, with the fake runner
/// substituted for the real one and a recording reporter/observer attached.
pub struct TestHarness {
    pub queue: Arc<TaskQueue>,
    pub workspace: Arc<Workspace>,
    pub runner: Arc<FakeRunner>,
    pub reporter: Arc<RecordingReporter>,
    pub observer: Arc<RecordingObserver>,
    pub ctx: TaskContext,
    wake_rx: Option<WakeReceiver>,
}

impl TestHarness {
    /// Harness over the real filesystem (pair with `tempfile` fixtures).
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        let runner = Arc::new(FakeRunner::new());
        let reporter = Arc::new(RecordingReporter::new());
        let observer = Arc::new(RecordingObserver::new());
        let workspace = Arc::new(Workspace::new());
        workspace.seed_emulator();

        let (queue, wake_rx) = TaskQueue::new(Box::new(ObserverHandle(Arc::clone(&observer))));

        let ctx = TaskContext {
            workspace: Arc::clone(&workspace),
            queue: Arc::clone(&queue),
            sdk: SdkTools::from_config(&SdkSection::default()),
            tools: ToolsSection::default(),
            fs,
            runner: Arc::clone(&runner) as Arc<dyn devpilot::exec::ProcessRunner>,
        };

        Self {
            queue,
            workspace,
            runner,
            reporter,
            observer,
            ctx,
            wake_rx: Some(wake_rx),
        }
    }

    /// Spawn the worker in one-shot mode and wait until it has drained the
    /// queue. Tasks must be enqueued before calling this.
    pub async fn drain(&mut self) {
        let wake_rx = self
            .wake_rx
            .take()
            .expect("drain may only be called once per harness");
        let handle = TaskWorker::spawn(
            Arc::clone(&self.queue),
            wake_rx,
            self.ctx.clone(),
            Arc::clone(&self.reporter) as Arc<dyn Reporter>,
            WorkerOptions {
                exit_when_idle: true,
            },
        );
        crate::with_timeout(async { handle.await.expect("worker panicked") }).await;
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter so the harness can keep a handle on the observer while the queue
/// owns its boxed copy.
struct ObserverHandle(Arc<RecordingObserver>);

impl QueueObserver for ObserverHandle {
    fn queue_size_changed(&self, remaining: usize) {
        self.0.queue_size_changed(remaining);
    }

    fn item_count_changed(&self, item: &devpilot::types::ItemRef, count: usize) {
        self.0.item_count_changed(item, count);
    }
}
