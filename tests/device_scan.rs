// tests/device_scan.rs
//
// Device enumeration and reconciliation, installed-app listing with OS
// version inference, and the host-mode version gates.

use std::sync::Arc;

use devpilot::queue::{Task, TaskKind};
use devpilot_test_utils::builders::TestHarness;
use devpilot_test_utils::init_tracing;

const SCAN_OUTPUT: &str = "\
\"topaz\" {aaa111} usb
\"emulator\" {c69dda} tcp 52199
";

#[tokio::test]
async fn scan_reconciles_the_device_registry() {
    init_tracing();
    let mut harness = TestHarness::new();

    // Previously known: A, B and a running emulator.
    harness.workspace.upsert_device("topaz", "aaa111", "usb");
    harness.workspace.upsert_device("castle", "bbb222", "usb");
    harness.workspace.upsert_device("emulator", "c69dda", "tcp 51000");

    // Fresh scan reports only A and the emulator (with a new port).
    harness.runner.respond("--device-list", 0, SCAN_OUTPUT, "");

    harness
        .queue
        .add_task(Arc::new(Task::new(TaskKind::DeviceScan, None, None)));
    harness.drain().await;

    let devices = harness.workspace.devices_snapshot();
    let mut names: Vec<&str> = devices.iter().map(|d| d.name()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Emulator", "HP TouchPad"]);

    // A updated in place, not duplicated; emulator refreshed.
    let touchpad = harness.workspace.find_device("aaa111").unwrap();
    assert_eq!(touchpad.location(), "usb");
    let emulator = harness.workspace.find_device("Emulator").unwrap();
    assert_eq!(emulator.id(), "c69dda");
    assert_eq!(emulator.location(), "tcp 52199");

    // B is gone.
    assert!(harness.workspace.find_device("bbb222").is_none());
}

#[tokio::test]
async fn scan_schedules_an_app_listing_for_each_discovered_device() {
    init_tracing();
    let mut harness = TestHarness::new();
    harness.runner.respond("--device-list", 0, SCAN_OUTPUT, "");

    harness
        .queue
        .add_task(Arc::new(Task::new(TaskKind::DeviceScan, None, None)));
    harness.drain().await;

    // The follow-up tasks ran in the same drain.
    assert_eq!(harness.runner.invocation_count("--device=aaa111 -l"), 1);
    assert_eq!(harness.runner.invocation_count("--device=c69dda -l"), 1);

    // Their (empty) results were recorded on the devices.
    let touchpad = harness.workspace.find_device("aaa111").unwrap();
    assert_eq!(touchpad.installed_apps(), Some(&[][..]));
}

#[tokio::test]
async fn scan_keeps_stale_devices_with_pending_tasks() {
    init_tracing();
    let mut harness = TestHarness::new();
    harness.workspace.upsert_device("castle", "bbb222", "usb");
    harness.runner.respond("--device-list", 0, SCAN_OUTPUT, "");

    // The scan runs first; the list-apps task for B is still queued at that
    // point, so B must survive the stale pass.
    harness
        .queue
        .add_task(Arc::new(Task::new(TaskKind::DeviceScan, None, None)));
    harness.queue.add_task(Arc::new(Task::new(
        TaskKind::DeviceListApps,
        None,
        Some("bbb222".to_string()),
    )));
    harness.drain().await;

    assert!(harness.workspace.find_device("bbb222").is_some());
}

#[tokio::test]
async fn list_apps_records_apps_and_infers_the_os_version() {
    init_tracing();
    let mut harness = TestHarness::new();
    harness.workspace.upsert_device("topaz", "aaa111", "usb");
    harness.runner.respond(
        "-l",
        0,
        "\
4 applications installed:
com.palm.app.youtube 2.1.0 SDK \"YouTube\"
* com.palm.app.messaging 2.1.0 SDK \"Messaging\"
nl.sinds1984.pong 0.5.0 \"Pong\"
* com.palm.app.calendar 3.0.0 SDK preview \"Calendar\"
",
        "",
    );

    harness.queue.add_task(Arc::new(Task::new(
        TaskKind::DeviceListApps,
        None,
        Some("aaa111".to_string()),
    )));
    harness.drain().await;

    let device = harness.workspace.find_device("aaa111").unwrap();
    let apps = device.installed_apps().unwrap();
    assert_eq!(apps.len(), 4);
    assert_eq!(apps[2].name, "Pong");
    assert_eq!(apps[2].id, "nl.sinds1984.pong");
    assert_eq!(apps[2].version, "0.5.0");

    // OS version taken from the calendar app; 3.0.0 also enables Enyo.
    assert_eq!(device.version(), "3.0.0");
    assert!(device.is_enyo_enabled());
}

#[tokio::test]
async fn list_apps_never_queries_the_offline_emulator() {
    init_tracing();
    let mut harness = TestHarness::new();

    let task = Arc::new(Task::new(
        TaskKind::DeviceListApps,
        None,
        Some("emulator".to_string()),
    ));
    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    assert!(!task.is_successful());
    assert!(task.report().is_none());
    assert!(harness.runner.invocations().is_empty());
}

async fn host_mode_report(version: Option<&str>, emulator_online: bool) -> (bool, String) {
    let mut harness = TestHarness::new();
    if emulator_online {
        harness.workspace.upsert_device("emulator", "c69dda", "tcp 52199");
        if let Some(version) = version {
            harness.workspace.set_device_version("c69dda", Some(version));
        }
    } else {
        harness.workspace.upsert_device("topaz", "aaa111", "usb");
    }

    let device = if emulator_online { "emulator" } else { "aaa111" };
    let task = Arc::new(Task::new(
        TaskKind::DeviceEnableHostMode,
        None,
        Some(device.to_string()),
    ));
    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    (task.is_successful(), task.report().unwrap_or_default())
}

#[tokio::test]
async fn host_mode_is_rejected_for_physical_devices() {
    init_tracing();
    let (success, report) = host_mode_report(None, false).await;
    assert!(success);
    assert_eq!(report, "Host Mode cannot be enabled for non-emulator devices.");
}

#[tokio::test]
async fn host_mode_tunnels_on_mid_versions() {
    init_tracing();
    let (success, report) = host_mode_report(Some("1.4.2"), true).await;
    assert!(success);
    assert!(report.starts_with("You can now open http://localhost:5580"));
    assert!(!report.contains("enabled by default"));
}

#[tokio::test]
async fn host_mode_is_a_noop_on_modern_versions() {
    init_tracing();
    let (success, report) = host_mode_report(Some("2.1.0"), true).await;
    assert!(success);
    assert!(report.contains("enabled by default (SDK 2.0+)"));
}

#[tokio::test]
async fn host_mode_is_unsupported_on_old_versions() {
    init_tracing();
    let (success, report) = host_mode_report(Some("1.3.5"), true).await;
    assert!(success);
    assert!(report.starts_with("Sorry, Host Mode could not be enabled"));
    assert!(report.contains("version 1.3.5"));
}

#[tokio::test]
async fn set_log_level_is_recorded_on_the_device() {
    init_tracing();
    let mut harness = TestHarness::new();
    harness.workspace.upsert_device("topaz", "aaa111", "usb");

    let task = Arc::new(Task::with_arguments(
        TaskKind::DeviceSetLogLevel,
        None,
        Some("aaa111".to_string()),
        vec!["warning".to_string()],
    ));
    harness.queue.add_task(Arc::clone(&task));
    harness.drain().await;

    assert!(task.is_successful());
    let device = harness.workspace.find_device("aaa111").unwrap();
    assert_eq!(device.log_level(), Some("warning"));
}
