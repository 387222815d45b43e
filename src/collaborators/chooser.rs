//! Agent project selection from the directory layout.
//!
//! The context path is either an agent project itself or a directory of
//! agent projects. With several candidates the user picks one from a
//! numbered list, which requires an interactive stdin.

use super::AgentChooser;
use crate::error::{FortaError, Result};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files that mark a directory as an agent project.
const PROJECT_MARKERS: &[&str] = &["package.json", "forta.config.json"];

/// File that marks a subdirectory as a candidate agent project.
const CANDIDATE_MARKER: &str = "package.json";

/// Chooses an agent project by inspecting the filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryAgentChooser {
    interactive: bool,
}

impl DirectoryAgentChooser {
    /// Chooser that prompts only when stdin is a terminal.
    pub fn new() -> Self {
        Self::with_interactive(io::stdin().is_terminal())
    }

    /// Chooser that prompts on several candidates only when `interactive`.
    pub fn with_interactive(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl Default for DirectoryAgentChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentChooser for DirectoryAgentChooser {
    fn choose(&self, root: &Path) -> Result<PathBuf> {
        if !root.is_dir() {
            return Err(FortaError::AgentSelection(format!(
                "agent directory '{}' does not exist.\n\n\
                 Run `forta-tasks init` or `forta-tasks generate` to create one, \
                 or set forta.contextPath in forta-tasks.yaml.",
                root.display()
            )));
        }

        if is_agent_project(root) {
            return Ok(root.to_path_buf());
        }

        let mut candidates = find_candidates(root)?;
        match candidates.len() {
            0 => Err(FortaError::AgentSelection(format!(
                "no agent projects found in '{}'",
                root.display()
            ))),
            1 => Ok(candidates.remove(0)),
            _ if self.interactive => {
                let stdin = io::stdin();
                let mut stderr = io::stderr();
                prompt_selection(&candidates, &mut stdin.lock(), &mut stderr)
            }
            _ => Err(FortaError::AgentSelection(format!(
                "multiple agent projects found in '{}' and no terminal to choose from:\n{}",
                root.display(),
                format_candidates(&candidates)
            ))),
        }
    }
}

fn is_agent_project(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

/// Immediate subdirectories of `root` that contain a `package.json`,
/// sorted by path.
fn find_candidates(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| {
        FortaError::AgentSelection(format!(
            "failed to read agent directory '{}': {}",
            root.display(),
            e
        ))
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join(CANDIDATE_MARKER).is_file())
        .collect();
    candidates.sort();

    debug!(root = %root.display(), count = candidates.len(), "agent candidates");
    Ok(candidates)
}

fn candidate_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|path| format!("  {}", candidate_label(path)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask for a 1-based index until a valid one is entered.
fn prompt_selection<R: BufRead, W: Write>(
    candidates: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    let io_err = |e: io::Error| FortaError::AgentSelection(format!("failed to prompt for agent: {}", e));

    writeln!(output, "Multiple agents found:").map_err(io_err)?;
    for (i, path) in candidates.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, candidate_label(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Select an agent [1-{}]: ", candidates.len()).map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(FortaError::AgentSelection(
                "no agent selected (input closed)".to_string(),
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(candidates[n - 1].clone()),
            _ => writeln!(output, "Invalid selection '{}'", line.trim()).map_err(io_err)?,
        }
    }
}
