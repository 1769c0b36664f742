// src/ops/project.rs

//! Project operation handlers.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::ops::{
    available_destination, project_for, refreshed_project_for, Outcome, TaskContext,
};
use crate::queue::Task;

/// Package the project into an installable artifact.
///
/// `palm-package --outdir=<loc>/bin <loc>/app_src [<loc>/app_service]
/// [<loc>/app_package]`
pub async fn package(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = refreshed_project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let mut cmd = ctx.sdk.tool("palm-package");
    cmd.push(format!("--outdir={}", project.bin_dir()));
    cmd.push(project.app_src_dir());
    if project.has_service() {
        cmd.push(format!("{}/app_service", project.location()));
    }
    if project.has_package() {
        cmd.push(format!("{}/app_package", project.location()));
    }

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail(output.stderr);
    }
    Outcome::ok()
}

/// Install the project's package artifact onto the destination device.
///
/// When the artifact is missing it is packaged first; a failed packaging run
/// surfaces its own report unchanged.
pub async fn install(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = refreshed_project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let artifact = project.artifact_path();

    if !ctx.fs.is_file(Path::new(&artifact)) {
        let packaged = package(ctx, task).await;
        if !packaged.success {
            return packaged;
        }
        if !ctx.fs.is_file(Path::new(&artifact)) {
            return Outcome::fail("Installing failed, getting the project package failed.");
        }
    }

    let Some(device) = available_destination(ctx, task) else {
        return Outcome::fail(format!(
            "Installing {} failed, because the destination device is not available.",
            project.name()
        ));
    };

    // Enyo apps need OS support on the device side.
    if project.is_enyo() && !device.is_enyo_enabled() {
        return Outcome::fail(format!(
            "Installing {} failed, because the destination device does not support the required Enyo framework.",
            project.name()
        ));
    }

    let mut cmd = ctx.sdk.tool("palm-install");
    cmd.push(format!("--device={}", device.id()));
    cmd.push(artifact);

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail(output.stderr);
    }
    Outcome::ok()
}

/// Launch (or, with `close`, terminate) the project's app on the destination
/// device: `palm-launch --device=<id> [-c] <appid>`.
pub async fn launch(ctx: &TaskContext, task: &Task, close: bool) -> Outcome {
    let Some(project) = project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let Some(device) = available_destination(ctx, task) else {
        return Outcome::fail(format!(
            "Launching {} failed, because the destination device is not available.",
            project.name()
        ));
    };

    let mut cmd = ctx.sdk.tool("palm-launch");
    cmd.push(format!("--device={}", device.id()));
    if close {
        cmd.push("-c".to_string());
    }
    cmd.push(project.id().to_string());

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        // Launching an app that was never installed has a well-known stderr
        // shape; translate it into something readable.
        if output.stderr.contains("no matches for") {
            return Outcome::fail(format!(
                "The application {} could not be launched as it is not yet installed.",
                project.name()
            ));
        }
        return Outcome::fail(output.stderr);
    }
    Outcome::ok()
}

/// Remove the project's app from the destination device:
/// `palm-install --device=<id> -r <appid>`. Removing an app that is already
/// absent counts as success.
pub async fn uninstall(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let Some(device) = available_destination(ctx, task) else {
        return Outcome::fail(format!(
            "Uninstalling {} failed, because the destination device is not available.",
            project.name()
        ));
    };

    let mut cmd = ctx.sdk.tool("palm-install");
    cmd.push(format!("--device={}", device.id()));
    cmd.push("-r".to_string());
    cmd.push(project.id().to_string());

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        // The tool complains when the app was not installed to begin with;
        // the goal is reached either way.
        if !output.stderr.contains("command failed with returnValue: false") {
            return Outcome::fail(output.stderr);
        }
    }
    Outcome::ok()
}

/// Run the project's deploy script, if it has one. Non-Enyo2 projects have
/// nothing to deploy and short-circuit to success.
pub async fn deploy(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = refreshed_project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let script = project.deploy_script();
    if !ctx.fs.is_file(Path::new(&script)) {
        debug!(
            project = project.name(),
            "no tools/deploy.sh found (not required for non-Enyo2 projects)"
        );
        return Outcome::ok();
    }

    let output = ctx.runner.run(ctx.sdk.script(&script)).await;
    if output.exit_code >= 2 {
        return Outcome::fail(output.stderr);
    }
    if output.exit_code == 1 {
        // Regular compile trouble; it belongs in a scrollable log, not a
        // dialog.
        return Outcome::fail_silent();
    }
    Outcome::ok()
}

/// Composite: deploy, package, install, launch, stopping at the first
/// failure and surfacing its outcome.
pub async fn run_all(ctx: &TaskContext, task: &Task) -> Outcome {
    let deployed = deploy(ctx, task).await;
    if !deployed.success {
        return deployed;
    }
    let packaged = package(ctx, task).await;
    if !packaged.success {
        return packaged;
    }
    let installed = install(ctx, task).await;
    if !installed.success {
        return installed;
    }
    launch(ctx, task, false).await
}

/// Create a new project skeleton and generate the app sources into it:
/// `palm-generate -p "{title:'<name>'}" <folder>/app_src`.
pub async fn new_project(ctx: &TaskContext, task: &Task) -> Outcome {
    let (Some(parent), Some(name)) = (task.argument(0), task.argument(1)) else {
        warn!("new-project task is missing its destination and name arguments");
        return Outcome::fail_silent();
    };

    // Folder name without any whitespace.
    let folder: String = format!("{parent}/{name}").split_whitespace().collect();
    info!(folder, "creating new project");

    let created = ctx.fs.create_dir_all(Path::new(&folder)).is_ok()
        && ctx.fs.create_dir_all(Path::new(&format!("{folder}/bin"))).is_ok()
        && ctx
            .fs
            .create_dir_all(Path::new(&format!("{folder}/app_src")))
            .is_ok();
    if !created {
        return Outcome::fail(
            "Creating a new project failed. The necessary directories could not be created, \
             perhaps because of access or privilege issues?",
        );
    }

    let mut cmd = ctx.sdk.tool("palm-generate");
    cmd.push("-p".to_string());
    cmd.push(format!("\"{{title:'{name}'}}\""));
    cmd.push(format!("{folder}/app_src"));

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail(output.stderr);
    }

    // Register the generated project; a generator that produced an odd
    // layout only costs us the registration, not the task.
    if let Err(err) = ctx.workspace.open_project(&*ctx.fs, &folder) {
        warn!(folder, error = %err, "generated project could not be opened");
    }
    Outcome::ok()
}

/// Generate a new scene into an existing project:
/// `palm-generate -t new_scene -p "{name:'<scene>'}" <loc>/app_src`.
pub async fn new_scene(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = project_for(ctx, task) else {
        return Outcome::fail_silent();
    };
    let Some(scene) = task.argument(0) else {
        warn!("new-scene task is missing the scene name argument");
        return Outcome::fail_silent();
    };

    let mut cmd = ctx.sdk.tool("palm-generate");
    cmd.push("-t".to_string());
    cmd.push("new_scene".to_string());
    cmd.push("-p".to_string());
    cmd.push(format!("\"{{name:'{scene}'}}\""));
    cmd.push(project.app_src_dir());

    let output = ctx.runner.run(cmd).await;
    if !output.success() {
        return Outcome::fail(output.stderr);
    }

    // sources.json changed on disk; sync the in-memory view.
    ctx.workspace.refresh_project(&*ctx.fs, &project.key());
    Outcome::ok()
}

/// Show the project folder in the platform file manager.
pub async fn reveal(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = project_for(ctx, task) else {
        return Outcome::fail_silent();
    };
    crate::ops::tools::open_path(ctx, project.location()).await
}

/// Refresh the project so the analysis collaborator works on current
/// sources.
pub async fn lint_scan(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = refreshed_project_for(ctx, task) else {
        return Outcome::fail_silent();
    };
    info!(
        project = project.name(),
        sources = project.sources().len(),
        "project refreshed for analysis"
    );
    Outcome::ok()
}

/// Open the project's entry document in the default desktop browser.
pub async fn open_in_browser(ctx: &TaskContext, task: &Task) -> Outcome {
    let Some(project) = project_for(ctx, task) else {
        return Outcome::fail_silent();
    };

    let failed = || {
        Outcome::fail(format!(
            "Opening {} in default browser failed, because something went wrong.",
            project.name()
        ))
    };

    let Some(main) = project.main() else {
        return failed();
    };
    let url = format!("file://{}/app_src/{}", project.location(), main);

    let output = ctx
        .runner
        .run(vec![crate::exec::opener_command().to_string(), url])
        .await;
    if !output.success() {
        return failed();
    }
    Outcome::ok()
}
