// src/exec/sdk.rs

//! Command-line construction for the vendor SDK tools.
//!
//! The `palm-*` tools are shell scripts, so every invocation goes through the
//! configured shell: `["/bin/bash", "/opt/PalmSDK/Current/bin/palm-package",
//! ...]`. Handlers append their operation-specific arguments to the vector
//! returned here. The argument shapes are a compatibility contract with the
//! SDK and must not be reworded.

use crate::config::SdkSection;

/// Builds command token vectors for the SDK tools from the configured
/// install location.
#[derive(Debug, Clone)]
pub struct SdkTools {
    bin_dir: String,
    shell: String,
}

impl SdkTools {
    pub fn from_config(cfg: &SdkSection) -> Self {
        Self {
            bin_dir: cfg.bin_dir.trim_end_matches('/').to_string(),
            shell: cfg.shell.clone(),
        }
    }

    /// Invocation prefix for a named SDK tool, e.g. `tool("palm-package")`.
    pub fn tool(&self, name: &str) -> Vec<String> {
        vec![self.shell.clone(), format!("{}/{}", self.bin_dir, name)]
    }

    /// Invocation prefix for a project-local script such as a deploy script.
    pub fn script(&self, path: &str) -> Vec<String> {
        vec![self.shell.clone(), path.to_string()]
    }
}

/// Platform command used to open files, folders, and applications with the
/// default handler.
pub fn opener_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkSection;

    #[test]
    fn tool_invocation_goes_through_shell() {
        let sdk = SdkTools::from_config(&SdkSection::default());
        assert_eq!(
            sdk.tool("palm-package"),
            vec![
                "/bin/bash".to_string(),
                "/opt/PalmSDK/Current/bin/palm-package".to_string()
            ]
        );
    }

    #[test]
    fn trailing_slash_in_bin_dir_is_normalised() {
        let cfg = SdkSection {
            bin_dir: "/sdk/bin/".to_string(),
            shell: "/bin/sh".to_string(),
        };
        let sdk = SdkTools::from_config(&cfg);
        assert_eq!(sdk.tool("palm-launch")[1], "/sdk/bin/palm-launch");
    }
}
