// tests/run_composite.rs
//
// The `run` composite: deploy, package, install, launch in sequence with
// short-circuiting on the first failure.

use std::sync::Arc;

use devpilot::queue::{Task, TaskKind};
use devpilot::types::ItemRef;
use devpilot_test_utils::builders::{write_mojo_project, TestHarness};
use devpilot_test_utils::init_tracing;

fn run_task(harness: &TestHarness, dir: &std::path::Path, device: &str) -> Arc<Task> {
    write_mojo_project(dir, "com.example.app", "1.2.3", "Example");
    let key = harness
        .workspace
        .open_project(&*harness.ctx.fs, dir.to_str().unwrap())
        .unwrap();
    Arc::new(Task::new(
        TaskKind::ProjectRun,
        Some(ItemRef::Project(key)),
        Some(device.to_string()),
    ))
}

#[tokio::test]
async fn run_stops_after_a_packaging_failure() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut harness = TestHarness::new();
    let task = run_task(&harness, dir.path(), "abc123");
    harness.workspace.upsert_device("topaz", "abc123", "usb");
    harness.runner.respond("palm-package", 1, "", "boom");

    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    assert!(!task.is_successful());
    assert_eq!(task.report().as_deref(), Some("boom"));
    assert_eq!(harness.runner.invocation_count("palm-install"), 0);
    assert_eq!(harness.runner.invocation_count("palm-launch"), 0);
}

#[tokio::test]
async fn run_stops_when_install_cannot_get_an_artifact() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut harness = TestHarness::new();
    let task = run_task(&harness, dir.path(), "abc123");
    harness.workspace.upsert_device("topaz", "abc123", "usb");
    // The packager reports success but never writes the artifact.

    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    assert!(!task.is_successful());
    assert_eq!(
        task.report().as_deref(),
        Some("Installing failed, getting the project package failed.")
    );
    // Package ran for the package step and once more for install's retry.
    assert_eq!(harness.runner.invocation_count("palm-package"), 2);
    assert_eq!(harness.runner.invocation_count("palm-launch"), 0);
}

#[tokio::test]
async fn run_executes_all_four_stages_in_order() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut harness = TestHarness::new();
    let task = run_task(&harness, dir.path(), "abc123");
    harness.workspace.upsert_device("topaz", "abc123", "usb");
    std::fs::write(dir.path().join("bin/com.example.app_1.2.3_all.ipk"), b"ipk").unwrap();

    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    assert!(task.is_successful());
    assert!(task.report().is_none());

    // A Mojo project has no deploy script, so the stages that shell out are
    // package, install, launch, in that order.
    let order: Vec<String> = harness
        .runner
        .invocations()
        .iter()
        .map(|cmd| cmd.join(" "))
        .collect();
    assert_eq!(order.len(), 3);
    assert!(order[0].contains("palm-package"));
    assert!(order[1].contains("palm-install"));
    assert!(order[2].contains("palm-launch"));
}
