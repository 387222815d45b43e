//! CLI argument parsing for forta-tasks.
//!
//! Global options are declared with clap derive. Task subcommands are not:
//! they are registered at startup from the task table in `tasks`, so the
//! table stays the single description of each task's arguments.

use crate::tasks::{TaskInvocation, find_task, register_tasks};
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Command, FromArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;

/// Subcommand that lists the task table.
pub const LIST_TASKS: &str = "tasks";

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Host project root (default: nearest directory with forta-tasks.yaml).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Host config file (default: <root>/forta-tasks.yaml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the agent CLI request instead of running it.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Run one agent task.
    Task(TaskInvocation),
    /// Print the task table.
    ListTasks,
}

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct Cli {
    pub globals: GlobalArgs,
    pub command: CliCommand,
}

/// Build the full clap command, tasks included.
pub fn build_command() -> Command {
    let command = Command::new("forta-tasks")
        .about("Initialize, run, and publish Forta agents from a host project")
        .version(env!("CARGO_PKG_VERSION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = GlobalArgs::augment_args(command)
        .subcommand(Command::new(LIST_TASKS).about("List the available agent tasks"));

    register_tasks(command)
}

impl Cli {
    /// Parse command line arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        match Self::try_parse_from(std::env::args_os()) {
            Ok(cli) => cli,
            Err(err) => err.exit(),
        }
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = build_command();
        let matches = command.try_get_matches_from_mut(args)?;
        let globals = GlobalArgs::from_arg_matches(&matches)?;

        let command = match matches.subcommand() {
            Some((LIST_TASKS, _)) => CliCommand::ListTasks,
            Some((name, sub_matches)) => {
                let spec = find_task(name).ok_or_else(|| {
                    command.error(ErrorKind::InvalidSubcommand, format!("unknown task '{}'", name))
                })?;
                CliCommand::Task(spec.collect(sub_matches))
            }
            None => return Err(command.error(ErrorKind::MissingSubcommand, "no task given")),
        };

        Ok(Self { globals, command })
    }
}
