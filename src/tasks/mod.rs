//! Agent tasks: the task table, invocations, and the dispatcher.
//!
//! Tasks either run the agent CLI through a `CommandExecutor` or, for
//! `generate`, scaffold a project through a `TemplateGenerator`. Tasks that
//! operate on an existing agent first ask the `AgentChooser` which project
//! under the context path to use; `init`, `keyfile`, and `generate` use the
//! resolved context path as-is.

mod catalog;
mod dispatcher;
mod request;


pub use catalog::{
    ArgKind, ArgSpec, CATALOG, ContextSource, DEFAULT_AGENT_CONFIG_FILE, Delegate, TaskName,
    TaskSpec, find_task, register_tasks,
};
pub use dispatcher::{TaskDispatcher, TaskOutcome};
pub use request::{ArgValue, CONTEXT_PATH_KEY, CommandRequest, TaskArgs, TaskInvocation, canonical_key};
