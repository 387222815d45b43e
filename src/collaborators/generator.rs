//! Built-in agent project template.
//!
//! Writes a minimal JavaScript agent into an empty or missing directory:
//!
//! ```text
//! <root>/
//!   package.json
//!   forta.config.json
//!   .gitignore
//!   src/agent.js
//! ```

use super::TemplateGenerator;
use crate::error::{FortaError, Result};
use crate::fs::atomic_write_file;
use serde_json::json;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

const AGENT_JS: &str = r#"const { Finding, FindingSeverity, FindingType } = require("forta-agent");

function provideHandleTransaction() {
  return async function handleTransaction(txEvent) {
    const findings = [];
    // inspect txEvent and push Finding.fromObject({...}) entries
    return findings;
  };
}

module.exports = {
  provideHandleTransaction,
  handleTransaction: provideHandleTransaction(),
  Finding,
  FindingSeverity,
  FindingType,
};
"#;

const GITIGNORE: &str = "node_modules/\ndist/\nforta.config.json\n";

/// Scaffolds agent projects from the built-in template.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldGenerator;

impl TemplateGenerator for ScaffoldGenerator {
    fn generate(&self, root: &Path) -> Result<()> {
        let name = package_name(root);
        let files = [
            ("package.json", package_json(&name)?),
            ("forta.config.json", "{}\n".to_string()),
            (".gitignore", GITIGNORE.to_string()),
            ("src/agent.js", AGENT_JS.to_string()),
        ];

        scaffold(root, &files)?;

        info!(root = %root.display(), package = %name, "generated agent project");
        println!("Generated agent project '{}' in {}", name, root.display());
        Ok(())
    }
}

/// Write `files` under an empty or missing `root`.
///
/// On failure anything written is removed again and `root` is back to
/// empty or missing.
fn scaffold(root: &Path, files: &[(&str, String)]) -> Result<()> {
    ensure_empty_target(root)?;
    let created_root = !root.exists();

    let written = files.iter().try_for_each(|(relative, content)| {
        atomic_write_file(root.join(relative), content).map_err(|e| FortaError::Template(e.to_string()))
    });

    if written.is_err() {
        let cleanup = if created_root {
            fs::remove_dir_all(root)
        } else {
            clear_dir(root)
        };
        if let Err(e) = cleanup {
            warn!(root = %root.display(), error = %e, "failed to remove partial agent project");
        }
    }

    written
}

fn clear_dir(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn ensure_empty_target(root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }

    if !root.is_dir() {
        return Err(FortaError::Template(format!(
            "'{}' exists and is not a directory",
            root.display()
        )));
    }

    let mut entries = fs::read_dir(root).map_err(|e| {
        FortaError::Template(format!("failed to read '{}': {}", root.display(), e))
    })?;

    if entries.next().is_some() {
        return Err(FortaError::Template(format!(
            "'{}' is not empty; refusing to overwrite an existing project",
            root.display()
        )));
    }

    Ok(())
}

/// npm package name derived from the directory name.
fn package_name(root: &Path) -> String {
    let raw = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut name = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
            name.push(c);
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }

    let name = name.trim_matches(|c| c == '-' || c == '.' || c == '_');
    if name.is_empty() {
        "forta-agent-project".to_string()
    } else {
        name.to_string()
    }
}

fn package_json(name: &str) -> Result<String> {
    let manifest = json!({
        "name": name,
        "version": "0.0.1",
        "description": "Forta Agent",
        "scripts": {
            "start": "npm run start:dev",
            "start:dev": "forta-agent run",
            "tx": "forta-agent run --tx",
            "block": "forta-agent run --block",
            "range": "forta-agent run --range",
            "file": "forta-agent run --file",
            "publish": "forta-agent publish",
            "push": "forta-agent push",
            "disable": "forta-agent disable",
            "enable": "forta-agent enable",
            "keyfile": "forta-agent keyfile"
        },
        "dependencies": {
            "forta-agent": "^0.1.48"
        }
    });

    serde_json::to_string_pretty(&manifest)
        .map(|s| s + "\n")
        .map_err(|e| FortaError::Template(format!("failed to render package.json: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generates_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("Whale Watcher");

        ScaffoldGenerator.generate(&root).unwrap();

        assert!(root.join("src").join("agent.js").is_file());
        assert!(root.join("forta.config.json").is_file());
        assert!(root.join(".gitignore").is_file());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
        assert_eq!(manifest["name"], "whale-watcher");
        assert_eq!(manifest["scripts"]["publish"], "forta-agent publish");
    }

    #[test]
    fn generates_into_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("agent");
        fs::create_dir_all(&root).unwrap();

        ScaffoldGenerator.generate(&root).unwrap();
        assert!(root.join("package.json").is_file());
    }

    #[test]
    fn refuses_non_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("agent");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("notes.txt"), "keep me").unwrap();

        let err = ScaffoldGenerator.generate(&root).unwrap_err();
        assert!(matches!(err, FortaError::Template(_)));
        assert!(err.to_string().contains("not empty"));
        assert!(!root.join("package.json").exists());
    }

    #[test]
    fn refuses_file_target() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("agent");
        fs::write(&root, "").unwrap();

        let err = ScaffoldGenerator.generate(&root).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    fn failing_files() -> Vec<(&'static str, String)> {
        // The second write needs `package.json` to be a directory.
        vec![
            ("package.json", "{}\n".to_string()),
            ("package.json/broken", String::new()),
        ]
    }

    #[test]
    fn failed_scaffold_removes_created_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("agent");

        let err = scaffold(&root, &failing_files()).unwrap_err();
        assert!(matches!(err, FortaError::Template(_)));
        assert!(!root.exists());

        ScaffoldGenerator.generate(&root).unwrap();
        assert!(root.join("src").join("agent.js").is_file());
    }

    #[test]
    fn failed_scaffold_leaves_existing_directory_empty() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("agent");
        fs::create_dir_all(&root).unwrap();

        assert!(scaffold(&root, &failing_files()).is_err());
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);

        ScaffoldGenerator.generate(&root).unwrap();
        assert!(root.join("package.json").is_file());
    }

    #[test]
    fn package_name_sanitizes_directory_name() {
        assert_eq!(package_name(Path::new("/p/My Agent!")), "my-agent");
        assert_eq!(package_name(Path::new("/p/agent_2.0")), "agent_2.0");
        assert_eq!(package_name(Path::new("/p/***")), "forta-agent-project");
        assert_eq!(package_name(Path::new("/")), "forta-agent-project");
    }
}
