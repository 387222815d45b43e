//! Project context resolution for forta-tasks.
//!
//! This module locates the host project root and computes the agent context
//! path exactly once per process. Every task reads the resolved path from
//! `ProjectContext`; nothing re-derives it from the raw config value.

use crate::config::{DEFAULT_CONFIG_FILE, HostConfig};
use crate::error::{FortaError, Result};
use std::env;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory name used for the agent project when no `contextPath` is set.
pub const DEFAULT_AGENT_DIR: &str = "agent";

/// Resolved, read-only context shared by every task invocation.
///
/// All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Absolute path to the host project root.
    pub root: PathBuf,

    /// Absolute path to the agent project (the resolved context path).
    pub context_path: PathBuf,

    /// Command line for the agent CLI.
    pub cli_command: String,
}

impl ProjectContext {
    /// Build the context from a host root and its loaded configuration.
    ///
    /// `root` must already be absolute.
    pub fn resolve(root: impl Into<PathBuf>, config: &HostConfig) -> Self {
        let root = root.into();
        let context_path = resolve_context_path(&root, config.forta.context_path.as_deref());

        debug!(
            root = %root.display(),
            context_path = %context_path.display(),
            "resolved agent context path"
        );

        Self {
            root,
            context_path,
            cli_command: config.forta.cli_command.clone(),
        }
    }
}

/// Compute the agent context path.
///
/// - absent or empty `context_path`: `root/agent`
/// - absolute `context_path`: returned unchanged
/// - relative `context_path`: `root` joined with it, with `.` and `..`
///   segments folded away
///
/// Performs no I/O; the path does not need to exist.
pub fn resolve_context_path(root: &Path, context_path: Option<&str>) -> PathBuf {
    match context_path {
        None | Some("") => root.join(DEFAULT_AGENT_DIR),
        Some(path) if Path::new(path).is_absolute() => PathBuf::from(path),
        Some(path) => normalize_lexically(&root.join(path)),
    }
}

/// Fold `.` and `..` components without consulting the filesystem.
///
/// `..` never climbs above the root of an absolute path. For a relative
/// path, leading `..` components that cannot be folded are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    // Number of `Normal` components currently in `normalized`
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    normalized.pop();
                    depth -= 1;
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(segment) => {
                normalized.push(segment);
                depth += 1;
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }

    normalized
}

/// Find the host project root from the current working directory.
pub fn discover_root() -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| {
        FortaError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    Ok(discover_root_from(&cwd))
}

/// Find the host project root starting at `start`.
///
/// The root is the nearest ancestor (including `start`) containing
/// `forta-tasks.yaml`; without one, `start` itself is the root.
pub fn discover_root_from(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(DEFAULT_CONFIG_FILE).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Make a user-supplied path absolute against the current directory.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_lexically(path));
    }

    let cwd = env::current_dir().map_err(|e| {
        FortaError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    Ok(normalize_lexically(&cwd.join(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DirGuard;
    use serial_test::serial;
    use tempfile::TempDir;

    fn proj() -> PathBuf {
        PathBuf::from("/proj")
    }

    #[test]
    fn test_absent_context_path_uses_agent_dir() {
        assert_eq!(resolve_context_path(&proj(), None), PathBuf::from("/proj/agent"));
    }

    #[test]
    fn test_empty_context_path_uses_agent_dir() {
        assert_eq!(resolve_context_path(&proj(), Some("")), PathBuf::from("/proj/agent"));
    }

    #[test]
    fn test_absolute_context_path_is_unchanged() {
        assert_eq!(
            resolve_context_path(&proj(), Some("/abs/agent")),
            PathBuf::from("/abs/agent")
        );
    }

    #[test]
    fn test_relative_context_path_is_normalized() {
        assert_eq!(
            resolve_context_path(&proj(), Some("./sub/../agent2")),
            PathBuf::from("/proj/agent2")
        );
    }

    #[test]
    fn test_relative_context_path_climbing_out_of_root() {
        assert_eq!(
            resolve_context_path(&proj(), Some("../shared/agents/")),
            PathBuf::from("/shared/agents")
        );
    }

    #[test]
    fn test_parent_segments_stop_at_filesystem_root() {
        assert_eq!(
            resolve_context_path(&proj(), Some("../../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn test_dot_context_path_is_root() {
        assert_eq!(resolve_context_path(&proj(), Some(".")), PathBuf::from("/proj"));
    }

    #[test]
    fn test_relative_result_has_no_dot_segments() {
        let resolved = resolve_context_path(&proj(), Some("a/./b/../../c/./d/.."));
        assert_eq!(resolved, PathBuf::from("/proj/c"));
        assert!(
            resolved
                .components()
                .all(|c| !matches!(c, Component::CurDir | Component::ParentDir))
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for raw in [None, Some("./sub/../agent2"), Some("/abs/agent"), Some("bots/one")] {
            let first = resolve_context_path(&proj(), raw);
            let again = resolve_context_path(&proj(), first.to_str());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_normalize_keeps_leading_parent_for_relative_paths() {
        assert_eq!(normalize_lexically(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_project_context_uses_config() {
        let mut config = HostConfig::default();
        config.forta.context_path = Some("bots".to_string());
        config.forta.cli_command = "forta-agent".to_string();

        let ctx = ProjectContext::resolve("/proj", &config);
        assert_eq!(ctx.root, PathBuf::from("/proj"));
        assert_eq!(ctx.context_path, PathBuf::from("/proj/bots"));
        assert_eq!(ctx.cli_command, "forta-agent");
    }

    #[test]
    fn test_discover_root_finds_config_in_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), "").unwrap();
        let nested = temp_dir.path().join("contracts").join("lib");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_root_from(&nested), temp_dir.path());
    }

    #[test]
    fn test_discover_root_without_config_is_start() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_root_from(&nested), nested);
    }

    #[test]
    #[serial]
    fn test_discover_root_from_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        std::fs::write(root.join(DEFAULT_CONFIG_FILE), "").unwrap();
        let nested = root.join("scripts");
        std::fs::create_dir_all(&nested).unwrap();

        let _guard = DirGuard::new(&nested);
        assert_eq!(discover_root().unwrap(), root);
    }

    #[test]
    #[serial]
    fn test_absolutize_joins_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();

        let _guard = DirGuard::new(&base);
        assert_eq!(absolutize(Path::new("./host/../proj")).unwrap(), base.join("proj"));
        assert_eq!(absolutize(Path::new("/x/./y")).unwrap(), PathBuf::from("/x/y"));
    }
}
