//! HostConfig loading and validation.

use super::model::HostConfig;
use crate::error::{FortaError, Result};
use std::path::Path;
use tracing::debug;

impl HostConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(HostConfig)` - Successfully loaded and validated config
    /// * `Err(FortaError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FortaError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config, falling back to defaults when the file does not exist.
    ///
    /// A file that was named explicitly on the command line must exist;
    /// the implicit `forta-tasks.yaml` is optional.
    pub fn load_or_default<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Self> {
        let path = path.as_ref();

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no host config found, using defaults");
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: HostConfig = serde_yaml::from_str(yaml)
            .map_err(|e| FortaError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// `forta.cliCommand` must split into at least one word.
    pub fn validate(&self) -> Result<()> {
        let words = shell_words::split(&self.forta.cli_command).map_err(|e| {
            FortaError::UserError(format!(
                "config validation failed: forta.cliCommand '{}' is not a valid command line: {}",
                self.forta.cli_command, e
            ))
        })?;

        if words.is_empty() {
            return Err(FortaError::UserError(
                "config validation failed: forta.cliCommand must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
