//! Collaborators the task dispatcher delegates to.
//!
//! The dispatcher only sees these traits. The runtime implementations here
//! launch the agent CLI as a subprocess, pick an agent project from the
//! directory layout, and scaffold new projects from a built-in template.

mod chooser;
mod executor;
mod generator;

pub use chooser::DirectoryAgentChooser;
pub use executor::{DryRunExecutor, ProcessExecutor};
pub use generator::ScaffoldGenerator;

use crate::error::Result;
use crate::tasks::{CommandRequest, TaskName};
use std::path::{Path, PathBuf};

/// Performs an agent command given a normalized request.
pub trait CommandExecutor {
    fn execute(&self, command: TaskName, request: &CommandRequest) -> Result<()>;
}

/// Resolves a context path to one concrete agent project.
pub trait AgentChooser {
    /// Return the agent project under `root`, or fail when there is none
    /// or the choice is ambiguous and cannot be made interactively.
    fn choose(&self, root: &Path) -> Result<PathBuf>;
}

/// Scaffolds a new agent project.
pub trait TemplateGenerator {
    fn generate(&self, root: &Path) -> Result<()>;
}
