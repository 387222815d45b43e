//! Routes a task invocation to exactly one collaborator call.

use super::catalog::{ContextSource, Delegate, TaskSpec};
use super::request::{CommandRequest, TaskInvocation};
use crate::collaborators::{AgentChooser, CommandExecutor, TemplateGenerator};
use crate::context::ProjectContext;
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// How a task finished when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The collaborator call succeeded.
    Completed,
    /// The collaborator failed, the failure was reported and swallowed.
    Reported(String),
}

/// Dispatches task invocations against a fixed project context.
pub struct TaskDispatcher<'a> {
    context: &'a ProjectContext,
    executor: &'a dyn CommandExecutor,
    chooser: &'a dyn AgentChooser,
    generator: &'a dyn TemplateGenerator,
}

impl<'a> TaskDispatcher<'a> {
    pub fn new(
        context: &'a ProjectContext,
        executor: &'a dyn CommandExecutor,
        chooser: &'a dyn AgentChooser,
        generator: &'a dyn TemplateGenerator,
    ) -> Self {
        Self {
            context,
            executor,
            chooser,
            generator,
        }
    }

    /// Run one task.
    ///
    /// Collaborator errors propagate unchanged, except for `generate`,
    /// whose errors are printed to stderr and turned into
    /// `TaskOutcome::Reported`.
    pub fn dispatch(&self, invocation: &TaskInvocation) -> Result<TaskOutcome> {
        let spec = invocation.spec();

        match spec.delegate {
            Delegate::Generator => Ok(self.generate()),
            Delegate::Executor => {
                let context_path = self.context_path_for(spec)?;
                let request = CommandRequest::build(&context_path, spec, &invocation.args);

                info!(
                    task = %spec.name,
                    context_path = %context_path.display(),
                    "running agent command"
                );
                self.executor.execute(spec.name, &request)?;
                Ok(TaskOutcome::Completed)
            }
        }
    }

    fn context_path_for(&self, spec: &TaskSpec) -> Result<PathBuf> {
        match spec.context {
            ContextSource::Resolved => Ok(self.context.context_path.clone()),
            ContextSource::Chooser => {
                let chosen = self.chooser.choose(&self.context.context_path)?;
                debug!(agent = %chosen.display(), "agent chosen");
                Ok(chosen)
            }
        }
    }

    fn generate(&self) -> TaskOutcome {
        match self.generator.generate(&self.context.context_path) {
            Ok(()) => TaskOutcome::Completed,
            Err(err) => {
                let message = format!("Error while generating agent project: {}", err);
                error!(context_path = %self.context.context_path.display(), "{}", message);
                eprintln!("{}", message);
                TaskOutcome::Reported(message)
            }
        }
    }
}
