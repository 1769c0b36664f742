// src/ops/tools.rs

//! Companion-process handlers: the platform opener, the resource monitor,
//! the log-tail stream, and the webkit browser.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::exec::{opener_command, spawn_detached};
use crate::ops::{destination_id, Outcome, TaskContext};
use crate::queue::Task;
use crate::types::ItemRef;

/// Open a file, folder, or application bundle with the platform default
/// handler. A missing path or a refusing opener fails without a report.
pub async fn open_path(ctx: &TaskContext, path: &str) -> Outcome {
    if !ctx.fs.exists(Path::new(path)) {
        warn!(path, "cannot open a path that does not exist");
        return Outcome::fail_silent();
    }

    let output = ctx
        .runner
        .run(vec![opener_command().to_string(), path.to_string()])
        .await;
    if !output.success() {
        return Outcome::fail_silent();
    }
    Outcome::ok()
}

/// Start the resource monitor for a device (optionally scoped to one app).
///
/// Prefers the standalone monitor application when installed, falling back
/// to the SDK's `palm-worm`. The monitor only returns when the user closes
/// it, so it runs detached and the task reports success immediately.
pub async fn resource_monitor(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(device_id) = destination_id(ctx, task) else {
        warn!("resource-monitor task has no destination device");
        return Outcome::fail_silent();
    };

    let mut cmd = if ctx.fs.exists(Path::new(&ctx.tools.monitor_app)) {
        vec![
            "open".to_string(),
            ctx.tools.monitor_app.clone(),
            "--args".to_string(),
        ]
    } else {
        ctx.sdk.tool("palm-worm")
    };
    cmd.push("-d".to_string());
    cmd.push(device_id);

    // Scope to the app when invoked from a project.
    if let Some(ItemRef::Project(key)) = task.source_item() {
        if let Some(project) = ctx.workspace.project_snapshot(key) {
            cmd.push(project.id().to_string());
        }
    }

    spawn_detached(Arc::clone(&ctx.runner), cmd);
    Outcome::ok()
}

/// Follow the device log stream for the project's app:
/// `palm-log -f --device=<id> <appid>`. The stream runs until its consumer
/// closes it, so it is detached from the queue.
pub async fn log_tail(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(ItemRef::Project(key)) = task.source_item() else {
        warn!("log-tail task has no project subject");
        return Outcome::fail_silent();
    };
    let Some(project) = ctx.workspace.project_snapshot(key) else {
        warn!(key, "log-tail subject project is not open");
        return Outcome::fail_silent();
    };
    let Some(device_id) = destination_id(ctx, task) else {
        warn!("log-tail task has no destination device");
        return Outcome::fail_silent();
    };

    let mut cmd = ctx.sdk.tool("palm-log");
    cmd.push("-f".to_string());
    cmd.push(format!("--device={device_id}"));
    cmd.push(project.id().to_string());

    spawn_detached(Arc::clone(&ctx.runner), cmd);
    Outcome::ok()
}

/// Open a webkit browser with the flags that let locally generated app
/// content run outside the device.
pub async fn open_webkit_browser(ctx: &TaskContext, task: &Task) -> Outcome {
    let choice = task.argument(0).unwrap_or(ctx.tools.browser.as_str());
    let app = if choice == "chrome" {
        "/Applications/Google Chrome.app"
    } else {
        "/Applications/Safari.app"
    };

    let cmd = vec![
        "open".to_string(),
        app.to_string(),
        "--args".to_string(),
        // All three are required for Enyo content to work in a desktop
        // browser.
        "--allow-file-access-from-files".to_string(),
        "--enable-file-cookies".to_string(),
        "--disable-web-security".to_string(),
    ];

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail(output.stderr);
    }
    Outcome::ok()
}
