//! Task invocations and the normalized requests built from them.

use super::catalog::{TaskName, TaskSpec};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Key under which every request carries its context path.
pub const CONTEXT_PATH_KEY: &str = "contextPath";

/// Value of a task argument.
///
/// Serializes as a JSON bool, string, or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Flag(bool),
    Text(String),
    Absent,
}

impl ArgValue {
    pub fn text(value: impl Into<String>) -> Self {
        ArgValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Argument values of one invocation, keyed by declared argument id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskArgs {
    values: BTreeMap<String, ArgValue>,
}

impl TaskArgs {
    pub fn insert(&mut self, id: impl Into<String>, value: ArgValue) {
        self.values.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> Option<&ArgValue> {
        self.values.get(id)
    }
}

/// A single task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInvocation {
    pub task: TaskName,
    pub args: TaskArgs,
}

impl TaskInvocation {
    /// Invocation with every declared argument at its default.
    pub fn with_defaults(task: TaskName) -> Self {
        let mut args = TaskArgs::default();
        for arg in task.spec().args {
            args.insert(arg.id, arg.default_value());
        }
        Self { task, args }
    }

    /// Override one argument.
    pub fn with_arg(mut self, id: &str, value: ArgValue) -> Self {
        self.args.insert(id, value);
        self
    }

    pub fn spec(&self) -> &'static TaskSpec {
        self.task.spec()
    }
}

/// Map a declared argument id to the key forwarded to the agent CLI.
///
/// `configFile` is forwarded as `config`; every other id passes through.
pub fn canonical_key(id: &str) -> &str {
    match id {
        "configFile" => "config",
        other => other,
    }
}

/// Normalized payload handed to the command executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandRequest {
    fields: BTreeMap<String, ArgValue>,
}

impl CommandRequest {
    /// Build the request for `spec` from the invocation arguments.
    ///
    /// Only declared arguments are forwarded; a declared argument missing
    /// from `args` is forwarded at its default.
    pub fn build(context_path: &Path, spec: &TaskSpec, args: &TaskArgs) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            CONTEXT_PATH_KEY.to_string(),
            ArgValue::Text(context_path.to_string_lossy().into_owned()),
        );

        for arg in spec.args {
            let value = args
                .get(arg.id)
                .cloned()
                .unwrap_or_else(|| arg.default_value());
            fields.insert(canonical_key(arg.id).to_string(), value);
        }

        Self { fields }
    }

    pub fn context_path(&self) -> Option<&str> {
        self.fields.get(CONTEXT_PATH_KEY).and_then(ArgValue::as_text)
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
