//! The fixed table of agent tasks.
//!
//! Each entry declares the task's arguments, where its context path comes
//! from, and which collaborator receives the call. The CLI registers its
//! subcommands by iterating this table, and the dispatcher normalizes
//! requests from the same declarations.

use super::request::{ArgValue, TaskArgs, TaskInvocation};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fmt;

/// Default agent config file forwarded by `run`, `publish`, and `push`.
pub const DEFAULT_AGENT_CONFIG_FILE: &str = "forta.config.json";

/// Prefix of the legacy task names, registered as aliases.
pub const LEGACY_PREFIX: &str = "forta-agent:";

/// Name of an agent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    Init,
    Run,
    Publish,
    Push,
    Disable,
    Enable,
    Keyfile,
    Generate,
}

impl TaskName {
    /// Command name as registered on the CLI and passed to the agent CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Init => "init",
            TaskName::Run => "run",
            TaskName::Publish => "publish",
            TaskName::Push => "push",
            TaskName::Disable => "disable",
            TaskName::Enable => "enable",
            TaskName::Keyfile => "keyfile",
            TaskName::Generate => "generate",
        }
    }

    /// Legacy name, `forta-agent:<name>`, accepted as an alias.
    pub fn legacy_name(&self) -> String {
        format!("{}{}", LEGACY_PREFIX, self.as_str())
    }

    /// Catalog entry for this task. `CATALOG` is ordered like the enum.
    pub fn spec(&self) -> &'static TaskSpec {
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a task takes its context path from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSource {
    /// The statically resolved context path. Used by tasks that may run
    /// before an agent project exists.
    Resolved,
    /// Whatever the agent chooser selects under the resolved context path.
    Chooser,
}

impl ContextSource {
    pub fn describe(&self) -> &'static str {
        match self {
            ContextSource::Resolved => "context path",
            ContextSource::Chooser => "chosen agent",
        }
    }
}

/// Collaborator that performs the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegate {
    /// The agent CLI, through the command executor.
    Executor,
    /// The project template generator.
    Generator,
}

/// Kind of a declared task argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Boolean switch, `false` unless given.
    Flag,
    /// Optional value, with an optional default literal.
    Param { default: Option<&'static str> },
}

/// A declared task argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    /// Argument id, also the key used before renaming.
    pub id: &'static str,
    /// Long option on the command line.
    pub long: &'static str,
    pub help: &'static str,
    pub kind: ArgKind,
}

impl ArgSpec {
    const fn flag(id: &'static str, long: &'static str, help: &'static str) -> Self {
        Self {
            id,
            long,
            help,
            kind: ArgKind::Flag,
        }
    }

    const fn param(id: &'static str, long: &'static str, help: &'static str) -> Self {
        Self {
            id,
            long,
            help,
            kind: ArgKind::Param { default: None },
        }
    }

    const fn param_with_default(
        id: &'static str,
        long: &'static str,
        help: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            id,
            long,
            help,
            kind: ArgKind::Param {
                default: Some(default),
            },
        }
    }

    /// Value used when the argument is not given.
    pub fn default_value(&self) -> ArgValue {
        match self.kind {
            ArgKind::Flag => ArgValue::Flag(false),
            ArgKind::Param { default: Some(d) } => ArgValue::Text(d.to_string()),
            ArgKind::Param { default: None } => ArgValue::Absent,
        }
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.id).long(self.long).help(self.help);
        match self.kind {
            ArgKind::Flag => arg.action(ArgAction::SetTrue),
            ArgKind::Param { default } => {
                let arg = arg.action(ArgAction::Set).value_name("VALUE");
                match default {
                    Some(d) => arg.default_value(d),
                    None => arg,
                }
            }
        }
    }

    fn collect(&self, matches: &ArgMatches) -> ArgValue {
        match self.kind {
            ArgKind::Flag => ArgValue::Flag(matches.get_flag(self.id)),
            ArgKind::Param { .. } => matches
                .get_one::<String>(self.id)
                .cloned()
                .map(ArgValue::Text)
                .unwrap_or_else(|| self.default_value()),
        }
    }
}

/// One row of the task table.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: TaskName,
    pub description: &'static str,
    pub args: &'static [ArgSpec],
    pub context: ContextSource,
    pub delegate: Delegate,
}

impl TaskSpec {
    /// Build the clap subcommand for this task.
    pub fn to_command(&self) -> Command {
        Command::new(self.name.as_str())
            .about(self.description)
            .alias(self.name.legacy_name())
            .args(self.args.iter().map(ArgSpec::to_arg))
    }

    /// Turn parsed subcommand matches into an invocation.
    pub fn collect(&self, matches: &ArgMatches) -> TaskInvocation {
        let mut args = TaskArgs::default();
        for arg in self.args {
            args.insert(arg.id, arg.collect(matches));
        }
        TaskInvocation {
            task: self.name,
            args,
        }
    }
}

const CONFIG_FILE_HELP: &str = "Specify a config file";

const INIT_ARGS: &[ArgSpec] = &[
    ArgSpec::flag("typescript", "typescript", "Initialize as Typescript project"),
    ArgSpec::flag("python", "python", "Initialize as Python project"),
];

const RUN_ARGS: &[ArgSpec] = &[
    ArgSpec::param("tx", "tx", "Run with the specified transaction hash"),
    ArgSpec::param("block", "block", "Run with the specified block hash/number"),
    ArgSpec::param("range", "range", "Run with the specified block range (e.g. 15..20)"),
    ArgSpec::param("file", "file", "Run with the specified json file"),
    ArgSpec::flag("prod", "prod", "Run a server listening for events from a Forta Scanner"),
    ArgSpec::param_with_default(
        "configFile",
        "config-file",
        CONFIG_FILE_HELP,
        DEFAULT_AGENT_CONFIG_FILE,
    ),
    ArgSpec::flag(
        "nocache",
        "nocache",
        "Disables writing to the cache (but reads are still enabled)",
    ),
];

const CONFIG_FILE_ARGS: &[ArgSpec] = &[ArgSpec::param_with_default(
    "configFile",
    "config-file",
    CONFIG_FILE_HELP,
    DEFAULT_AGENT_CONFIG_FILE,
)];

/// Every agent task, in registration order.
pub const CATALOG: &[TaskSpec] = &[
    TaskSpec {
        name: TaskName::Init,
        description: "Initialize a Forta Agent project",
        args: INIT_ARGS,
        context: ContextSource::Resolved,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Run,
        description: "Run the Forta Agent with latest blockchain data",
        args: RUN_ARGS,
        context: ContextSource::Chooser,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Publish,
        description: "Publish the Forta Agent to the network",
        args: CONFIG_FILE_ARGS,
        context: ContextSource::Chooser,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Push,
        description: "Push the Forta Agent image to the repository",
        args: CONFIG_FILE_ARGS,
        context: ContextSource::Chooser,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Disable,
        description: "Disables the Forta Agent",
        args: &[],
        context: ContextSource::Chooser,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Enable,
        description: "Enables the Forta Agent",
        args: &[],
        context: ContextSource::Chooser,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Keyfile,
        description: "Prints out keyfile information",
        args: &[],
        context: ContextSource::Resolved,
        delegate: Delegate::Executor,
    },
    TaskSpec {
        name: TaskName::Generate,
        description: "Generate an agent project based on templates",
        args: &[],
        context: ContextSource::Resolved,
        delegate: Delegate::Generator,
    },
];

/// Look up a task by its registered name.
pub fn find_task(name: &str) -> Option<&'static TaskSpec> {
    CATALOG.iter().find(|spec| spec.name.as_str() == name)
}

/// Register every catalog task as a subcommand of `command`.
pub fn register_tasks(command: Command) -> Command {
    CATALOG
        .iter()
        .fold(command, |command, spec| command.subcommand(spec.to_command()))
}
