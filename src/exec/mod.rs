// src/exec/mod.rs

//! Process execution layer.
//!
//! All external SDK tools are run through here, using
//! `tokio::process::Command`.
//!
//! - [`runner`] provides the `ProcessRunner` trait and the concrete
//!   `RealProcessRunner` used in production; tests substitute a fake.
//! - [`sdk`] builds the command-line token vectors for the vendor tools.

pub mod runner;
pub mod sdk;

pub use runner::{spawn_detached, CommandOutput, ProcessRunner, RealProcessRunner};
pub use sdk::{opener_command, SdkTools};
