use crate::collaborators::{AgentChooser, CommandExecutor, TemplateGenerator};
use crate::error::{FortaError, Result};
use crate::tasks::{CommandRequest, TaskName};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A collaborator call observed by the fakes, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Choose(PathBuf),
    Execute(TaskName, CommandRequest),
    Generate(PathBuf),
}

/// Shared, ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub(crate) fn choose_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Choose(_)))
            .count()
    }

    /// The only executor request, panicking unless exactly one was made.
    pub(crate) fn single_request(&self) -> (TaskName, CommandRequest) {
        let requests: Vec<_> = self
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Execute(task, request) => Some((task, request)),
                _ => None,
            })
            .collect();
        assert_eq!(requests.len(), 1, "expected exactly one executor call");
        requests.into_iter().next().unwrap()
    }
}

pub(crate) struct FakeExecutor {
    log: CallLog,
    fail_with: Option<String>,
}

impl FakeExecutor {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_with: None,
        }
    }

    pub(crate) fn failing(log: &CallLog, message: &str) -> Self {
        Self {
            log: log.clone(),
            fail_with: Some(message.to_string()),
        }
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, command: TaskName, request: &CommandRequest) -> Result<()> {
        self.log.push(Call::Execute(command, request.clone()));
        match &self.fail_with {
            Some(message) => Err(FortaError::CommandFailed(message.clone())),
            None => Ok(()),
        }
    }
}

/// Chooser that always returns `choice`, or fails when `choice` is `None`.
pub(crate) struct FakeChooser {
    log: CallLog,
    choice: Option<PathBuf>,
}

impl FakeChooser {
    pub(crate) fn returning(log: &CallLog, choice: impl Into<PathBuf>) -> Self {
        Self {
            log: log.clone(),
            choice: Some(choice.into()),
        }
    }

    pub(crate) fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            choice: None,
        }
    }
}

impl AgentChooser for FakeChooser {
    fn choose(&self, root: &Path) -> Result<PathBuf> {
        self.log.push(Call::Choose(root.to_path_buf()));
        self.choice
            .clone()
            .ok_or_else(|| FortaError::AgentSelection("2 agents found, pick one".to_string()))
    }
}

pub(crate) struct FakeGenerator {
    log: CallLog,
    fail_with: Option<String>,
}

impl FakeGenerator {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_with: None,
        }
    }

    pub(crate) fn failing(log: &CallLog, message: &str) -> Self {
        Self {
            log: log.clone(),
            fail_with: Some(message.to_string()),
        }
    }
}

impl TemplateGenerator for FakeGenerator {
    fn generate(&self, root: &Path) -> Result<()> {
        self.log.push(Call::Generate(root.to_path_buf()));
        match &self.fail_with {
            Some(message) => Err(FortaError::Template(message.clone())),
            None => Ok(()),
        }
    }
}
