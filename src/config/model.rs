//! HostConfig struct definition and default implementation.

use serde::Deserialize;

/// File name of the host configuration, looked up at the project root.
pub const DEFAULT_CONFIG_FILE: &str = "forta-tasks.yaml";

/// Agent CLI launched for every executor-backed task.
pub const DEFAULT_CLI_COMMAND: &str = "npx forta-agent";

/// Host project configuration.
///
/// Only the nested `forta` section is read; other top-level keys belong to
/// the host project and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Settings for the Forta agent tasks.
    pub forta: FortaConfig,
}

/// The `forta` section of the host configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FortaConfig {
    /// Location of the agent project, relative to the host root or absolute.
    /// When unset the agent lives in `<root>/agent`.
    pub context_path: Option<String>,

    /// Command line used to launch the agent CLI (split with shell rules).
    #[serde(default = "default_cli_command")]
    pub cli_command: String,
}

impl Default for FortaConfig {
    fn default() -> Self {
        Self {
            context_path: None,
            cli_command: default_cli_command(),
        }
    }
}

fn default_cli_command() -> String {
    DEFAULT_CLI_COMMAND.to_string()
}
