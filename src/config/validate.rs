// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{DevpilotError, Result};

/// Semantic checks on a deserialized config.
pub fn validate(config: &ConfigFile) -> Result<()> {
    if config.sdk.bin_dir.trim().is_empty() {
        return Err(DevpilotError::ConfigError(
            "sdk.bin_dir must not be empty".to_string(),
        ));
    }
    if config.sdk.shell.trim().is_empty() {
        return Err(DevpilotError::ConfigError(
            "sdk.shell must not be empty".to_string(),
        ));
    }
    match config.tools.browser.as_str() {
        "safari" | "chrome" => Ok(()),
        other => Err(DevpilotError::ConfigError(format!(
            "tools.browser must be \"safari\" or \"chrome\", got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::ConfigFile;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&ConfigFile::default()).is_ok());
    }

    #[test]
    fn unknown_browser_is_rejected() {
        let mut cfg = ConfigFile::default();
        cfg.tools.browser = "netscape".to_string();
        assert!(validate(&cfg).is_err());
    }
}
