// src/config/model.rs

use serde::Deserialize;

/// Top-level config file (`Devpilot.toml`).
///
/// Every section and field has a default, so a missing or empty file yields a
/// usable configuration pointing at the stock SDK install locations.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub sdk: SdkSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// Where the vendor SDK lives and how its tools are invoked.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SdkSection {
    /// Directory holding the `palm-*` command-line tools.
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,
    /// Shell used to run the SDK tools (they are scripts, not binaries).
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for SdkSection {
    fn default() -> Self {
        Self {
            bin_dir: default_bin_dir(),
            shell: default_shell(),
        }
    }
}

/// Companion applications used by a few handlers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolsSection {
    /// Webkit browser choice for the open-browser task: "safari" or "chrome".
    #[serde(default = "default_browser")]
    pub browser: String,
    /// Standalone resource-monitor application; `palm-worm` is used when it
    /// is not installed.
    #[serde(default = "default_monitor_app")]
    pub monitor_app: String,
    /// Application that hosts the emulator.
    #[serde(default = "default_emulator_app")]
    pub emulator_app: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            browser: default_browser(),
            monitor_app: default_monitor_app(),
            emulator_app: default_emulator_app(),
        }
    }
}

fn default_bin_dir() -> String {
    "/opt/PalmSDK/Current/bin".to_string()
}

fn default_shell() -> String {
    "/bin/bash".to_string()
}

fn default_browser() -> String {
    "safari".to_string()
}

fn default_monitor_app() -> String {
    "/Applications/Palm Monitor.app".to_string()
}

fn default_emulator_app() -> String {
    "/Applications/VirtualBox.app".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(cfg.sdk.bin_dir, "/opt/PalmSDK/Current/bin");
        assert_eq!(cfg.sdk.shell, "/bin/bash");
        assert_eq!(cfg.tools.browser, "safari");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [sdk]
            bin_dir = "/usr/local/palm/bin"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sdk.bin_dir, "/usr/local/palm/bin");
        assert_eq!(cfg.sdk.shell, "/bin/bash");
        assert_eq!(cfg.tools.emulator_app, "/Applications/VirtualBox.app");
    }
}
