// src/ops/device.rs

//! Device operation handlers.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::exec::spawn_detached;
use crate::ops::{destination_id, Outcome, TaskContext};
use crate::queue::{Task, TaskKind};
use crate::types::ItemRef;
use crate::workspace::{version_to_int, InstalledApp};

/// App whose version mirrors the device OS version. Querying the OS
/// directly is not possible through the CLI tools, so the version of this
/// preinstalled app is used instead.
const OS_VERSION_MARKER_APP: &str = "com.palm.app.calendar";

/// Enumerate reachable devices and reconcile the registry with the result.
///
/// `palm-launch --device-list` prints one line per device:
/// `"<name>" {<id>} <location>`. Discovered devices are added or updated in
/// place; previously known devices whose id is no longer reported are
/// dropped, unless tasks still reference them. Each discovered device also
/// gets a follow-up list-apps task so its version and app list stay fresh.
pub async fn scan(ctx: &TaskContext, _task: &Task) -> Outcome {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    let line_re = LINE_RE
        .get_or_init(|| Regex::new(r#"^"([^"]+)"\s+\{(\w+)\}\s+(.+)$"#).expect("device regex"));

    let mut cmd = ctx.sdk.tool("palm-launch");
    cmd.push("--device-list".to_string());

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail_silent();
    }

    let known_before = ctx.workspace.available_device_ids();

    let mut found = Vec::new();
    for line in output.stdout.lines() {
        let Some(caps) = line_re.captures(line.trim_end()) else {
            continue;
        };
        let (name, id, location) = (&caps[1], &caps[2], &caps[3]);
        ctx.workspace.upsert_device(name, id, location);
        found.push(id.to_string());

        // Fetch version and installed apps asynchronously.
        ctx.queue.add_task(Arc::new(Task::new(
            TaskKind::DeviceListApps,
            None,
            Some(id.to_string()),
        )));
    }

    // Second pass: drop devices that disappeared since the last scan.
    for known in known_before {
        if found.iter().any(|id| *id == known) {
            continue;
        }
        let item = ItemRef::Device(known.clone());
        if ctx.queue.tasks_for_item(&item) == 0 {
            ctx.workspace.remove_device(&known);
        } else {
            debug!(id = %known, "stale device still has pending tasks; keeping it");
        }
    }

    Outcome::ok()
}

/// Fetch the installed-app list for the destination device and infer its OS
/// version from a well-known preinstalled app.
pub async fn list_apps(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(key) = task.destination_device() else {
        warn!("list-apps task has no destination device");
        return Outcome::fail_silent();
    };
    let Some(device) = ctx.workspace.find_device(key) else {
        warn!(key, "list-apps destination is not a known device");
        return Outcome::fail_silent();
    };
    // Never query the offline emulator placeholder.
    if device.is_offline() {
        return Outcome::fail_silent();
    }

    let mut cmd = ctx.sdk.tool("palm-launch");
    cmd.push(format!("--device={}", device.id()));
    cmd.push("-l".to_string());

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail_silent();
    }

    let apps = parse_app_list(&output.stdout);

    if let Some(marker) = apps.iter().find(|app| app.id == OS_VERSION_MARKER_APP) {
        ctx.workspace
            .set_device_version(device.id(), Some(&marker.version));
    }
    ctx.workspace.set_installed_apps(device.id(), Some(apps));

    Outcome::ok()
}

/// Parse `palm-launch --device=<id> -l` output. The first line is a header;
/// each following line looks like
/// `<*: running> <appId> <version> <SDK> <preview> "<displayName>"` with the
/// marker and flags optional.
fn parse_app_list(stdout: &str) -> Vec<InstalledApp> {
    static APP_RE: OnceLock<Regex> = OnceLock::new();
    let app_re = APP_RE.get_or_init(|| {
        Regex::new(r#"^(\*\s)?(.+?)\s(.+?)\s(SDK\s)?(preview\s)?"(.+?)""#).expect("app regex")
    });

    stdout
        .lines()
        .skip(1)
        .filter_map(|line| {
            let caps = app_re.captures(line.trim())?;
            Some(InstalledApp::new(&caps[6], &caps[2], &caps[3]))
        })
        .collect()
}

/// Start the device. For the emulator this opens the hosting application;
/// physical devices cannot be started from here and succeed as a no-op.
pub async fn start(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(key) = task.destination_device() else {
        return Outcome::fail_silent();
    };
    let Some(device) = ctx.workspace.find_device(key) else {
        return Outcome::fail_silent();
    };

    if device.is_emulator() {
        return crate::ops::tools::open_path(ctx, &ctx.tools.emulator_app).await;
    }
    Outcome::ok()
}

/// Placeholder processing for task kinds without real work behind them;
/// logs the task details and succeeds.
pub async fn placeholder(ctx: &TaskContext, task: &Task) -> Outcome {
    info!(
        task = task.name(),
        source = ?task.source_item(),
        destination = ?destination_id(ctx, task),
        "processing placeholder task"
    );
    Outcome::ok()
}

/// Enable host mode on the emulator so its web content is reachable from a
/// desktop browser.
///
/// Version-gated: 1.4.1–1.4.5 need an SSH port-forward into the emulator;
/// 2.0 and later ship with host mode on by default; anything older cannot do
/// it at all. Always reports, always succeeds.
pub async fn enable_host_mode(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(key) = task.destination_device() else {
        return Outcome::fail_silent();
    };
    let Some(device) = ctx.workspace.find_device(key) else {
        return Outcome::fail_silent();
    };

    if !device.is_emulator() {
        return Outcome::ok_with("Host Mode cannot be enabled for non-emulator devices.");
    }

    let version = device.version().to_string();
    let version_int = version_to_int(&version);

    if (141..=145).contains(&version_int) {
        // The tunnel stays up until the user closes it, so it must not
        // block the queue.
        spawn_detached(
            Arc::clone(&ctx.runner),
            vec![
                "ssh".to_string(),
                "-p".to_string(),
                "5522".to_string(),
                "-L".to_string(),
                "5580:localhost:8080".to_string(),
                "root@localhost".to_string(),
            ],
        );
        Outcome::ok_with(
            "You can now open http://localhost:5580\nin a WebKit browser, such as Chrome or Safari.",
        )
    } else if version_int >= 200 {
        Outcome::ok_with(
            "You can now open http://localhost:5580\nin a WebKit browser, such as Chrome or Safari.\
             \n\nIn the future you can directly open this URL\nin your browser, as the emulator has \
             Host Mode\nenabled by default (SDK 2.0+).",
        )
    } else {
        Outcome::ok_with(format!(
            "Sorry, Host Mode could not be enabled for this emulator (version {version}).\nSDK 1.4.1 or higher is required."
        ))
    }
}

/// Record the chosen log level on the device entry. There is no CLI command
/// to push the level to the device itself; the stored value steers the log
/// stream viewers.
pub async fn set_log_level(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(key) = task.destination_device() else {
        return Outcome::fail_silent();
    };
    let Some(level) = task.argument(0) else {
        warn!("set-log-level task is missing the level argument");
        return Outcome::fail_silent();
    };
    let Some(device) = ctx.workspace.find_device(key) else {
        return Outcome::fail_silent();
    };

    ctx.workspace.set_device_log_level(device.id(), level);
    Outcome::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_list_parsing_skips_header_and_reads_flags() {
        let stdout = "\
13 applications installed:
com.palm.app.youtube 2.1.0 SDK \"YouTube\"
* com.palm.app.messaging 2.1.0 SDK \"Messaging\"
com.quickoffice.webos 1.0.696 \"Quickoffice\"
com.palm.app.backup 3.0.0 SDK preview \"Backup\"
* com.palm.app.calendar 3.0.0 SDK preview \"Calendar\"
";
        let apps = parse_app_list(stdout);
        assert_eq!(apps.len(), 5);
        assert_eq!(apps[0], InstalledApp::new("YouTube", "com.palm.app.youtube", "2.1.0"));
        assert_eq!(
            apps[1],
            InstalledApp::new("Messaging", "com.palm.app.messaging", "2.1.0")
        );
        assert_eq!(
            apps[2],
            InstalledApp::new("Quickoffice", "com.quickoffice.webos", "1.0.696")
        );
        assert_eq!(apps[4], InstalledApp::new("Calendar", "com.palm.app.calendar", "3.0.0"));
    }
}
