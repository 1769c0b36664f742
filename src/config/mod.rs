// src/config/mod.rs

//! Configuration layer.
//!
//! - [`model`] defines the TOML data model (`[sdk]` and `[tools]` sections).
//! - [`loader`] reads and deserializes the config file.
//! - [`validate`] performs semantic checks after deserialization.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_or_default};
pub use model::{ConfigFile, SdkSection, ToolsSection};
