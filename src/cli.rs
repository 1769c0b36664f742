// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every subcommand is a thin producer for the task queue: it opens the
//! project and/or names the device, submits the matching task(s), and lets
//! the worker do the rest.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `devpilot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devpilot",
    version,
    about = "Drive the webOS SDK command-line tools: package, install, launch and inspect apps on devices.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Devpilot.toml` in the current working directory; built-in
    /// defaults are used when the file does not exist.
    #[arg(long, value_name = "PATH", default_value = "Devpilot.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVPILOT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scan for connected devices and running emulators.
    Scan,

    /// Package a project into an installable artifact.
    Package {
        /// Project folder.
        project: String,
    },

    /// Run a project's deploy script (Enyo 2 projects).
    Deploy {
        project: String,
    },

    /// Install a project's package onto a device.
    Install {
        project: String,
        /// Destination device id or name.
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Launch a project's app on a device.
    Launch {
        project: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Close a project's app on a device.
    Close {
        project: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Uninstall a project's app from a device.
    Uninstall {
        project: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Deploy, package, install and launch in one go.
    Run {
        project: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Create a new project skeleton and generate its sources.
    New {
        /// Folder the project folder is created in.
        destination: String,
        /// Project name.
        name: String,
    },

    /// Generate a new scene into an existing project.
    NewScene {
        project: String,
        /// Scene name.
        name: String,
    },

    /// Reveal a project folder in the file manager.
    Reveal {
        project: String,
    },

    /// Refresh a project's metadata and source list for analysis.
    Lint {
        project: String,
    },

    /// Open a project's entry document in the default browser.
    Open {
        project: String,
    },

    /// List the apps installed on a device.
    Apps {
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Start a device (opens the emulator application).
    Start {
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Enable host mode on the emulator.
    HostMode {
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Record the log level used for a device's log streams.
    SetLogLevel {
        /// One of error, warning, info.
        level: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Follow a project's log stream on a device.
    Log {
        project: String,
        #[arg(long, default_value = "emulator")]
        device: String,
    },

    /// Open the resource monitor for a device.
    Monitor {
        #[arg(long, default_value = "emulator")]
        device: String,
        /// Scope the monitor to this project's app.
        #[arg(long)]
        project: Option<String>,
    },

    /// Open a webkit browser suitable for locally generated app content.
    Browser {
        /// "safari" or "chrome"; defaults to the configured choice.
        #[arg(long)]
        choice: Option<String>,
    },
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
