//! Command execution for forta-tasks.
//!
//! Loads the host configuration, resolves the project context once, wires
//! the runtime collaborators, and hands the invocation to the dispatcher.

use crate::cli::{Cli, CliCommand, GlobalArgs};
use crate::collaborators::{
    CommandExecutor, DirectoryAgentChooser, DryRunExecutor, ProcessExecutor, ScaffoldGenerator,
};
use crate::config::{DEFAULT_CONFIG_FILE, HostConfig};
use crate::context::{ProjectContext, absolutize, discover_root};
use crate::error::Result;
use crate::tasks::{CATALOG, TaskDispatcher, TaskInvocation};

/// Dispatch a parsed command line.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        CliCommand::ListTasks => {
            print!("{}", format_task_list());
            Ok(())
        }
        CliCommand::Task(invocation) => {
            let ctx = load_context(&cli.globals)?;
            run_task(&ctx, &invocation, cli.globals.dry_run)
        }
    }
}

/// Build the project context from the global options.
pub fn load_context(globals: &GlobalArgs) -> Result<ProjectContext> {
    let root = match &globals.root {
        Some(root) => absolutize(root)?,
        None => discover_root()?,
    };

    let config = match &globals.config {
        Some(path) => HostConfig::load_or_default(absolutize(path)?, true)?,
        None => HostConfig::load_or_default(root.join(DEFAULT_CONFIG_FILE), false)?,
    };

    Ok(ProjectContext::resolve(root, &config))
}

fn run_task(ctx: &ProjectContext, invocation: &TaskInvocation, dry_run: bool) -> Result<()> {
    let process = ProcessExecutor::new(ctx.cli_command.as_str(), ctx.root.as_path());
    let executor: &dyn CommandExecutor = if dry_run { &DryRunExecutor } else { &process };
    let chooser = DirectoryAgentChooser::new();
    let generator = ScaffoldGenerator;

    TaskDispatcher::new(ctx, executor, &chooser, &generator).dispatch(invocation)?;
    Ok(())
}

/// Render the task table for `forta-tasks tasks`.
pub fn format_task_list() -> String {
    let width = CATALOG
        .iter()
        .map(|spec| spec.name.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Available tasks:\n\n");
    for spec in CATALOG {
        out.push_str(&format!(
            "  {:<width$}  {}  [{}]\n",
            spec.name.as_str(),
            spec.description,
            spec.context.describe(),
            width = width
        ));
    }
    out
}
