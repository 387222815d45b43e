//! Agent CLI executors.
//!
//! `ProcessExecutor` launches the configured agent CLI with the request
//! rendered as long options. `DryRunExecutor` prints the request instead.

use super::CommandExecutor;
use crate::error::{FortaError, Result};
use crate::tasks::{ArgValue, CommandRequest, TaskName};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Runs the agent CLI as a child process with inherited stdio.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    cli_command: String,
    working_dir: PathBuf,
}

impl ProcessExecutor {
    pub fn new(cli_command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            cli_command: cli_command.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Build the full argument vector, program first.
    ///
    /// Text values become `--key value`, true flags become `--key`, false
    /// flags and absent values are left out.
    pub fn build_argv(&self, command: TaskName, request: &CommandRequest) -> Result<Vec<String>> {
        let mut argv = shell_words::split(&self.cli_command).map_err(|e| {
            FortaError::UserError(format!(
                "failed to parse agent CLI command '{}': {}\n\
                 Fix: check for unmatched quotes in forta.cliCommand.",
                self.cli_command, e
            ))
        })?;

        if argv.is_empty() {
            return Err(FortaError::UserError(
                "agent CLI command is empty; set forta.cliCommand".to_string(),
            ));
        }

        argv.push(command.as_str().to_string());

        for (key, value) in request.iter() {
            match value {
                ArgValue::Text(text) => {
                    argv.push(format!("--{}", key));
                    argv.push(text.clone());
                }
                ArgValue::Flag(true) => argv.push(format!("--{}", key)),
                ArgValue::Flag(false) | ArgValue::Absent => {}
            }
        }

        Ok(argv)
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: TaskName, request: &CommandRequest) -> Result<()> {
        let argv = self.build_argv(command, request)?;
        let rendered = shell_words::join(&argv);
        debug!(command = %rendered, cwd = %self.working_dir.display(), "spawning agent CLI");

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(&self.working_dir)
            .status()
            .map_err(|e| {
                FortaError::CommandFailed(format!(
                    "failed to execute '{}': {}\n\
                     Fix: ensure the agent CLI is installed and in PATH.",
                    argv[0], e
                ))
            })?;

        if !status.success() {
            return Err(FortaError::CommandFailed(format!(
                "'{}' exited with {}",
                rendered, status
            )));
        }

        Ok(())
    }
}

/// Prints each request as JSON instead of running anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    pub fn render(command: TaskName, request: &CommandRequest) -> String {
        format!("{} {}", command, request.to_json())
    }
}

impl CommandExecutor for DryRunExecutor {
    fn execute(&self, command: TaskName, request: &CommandRequest) -> Result<()> {
        println!("{}", Self::render(command, request));
        Ok(())
    }
}
