//! Diff acquisition from various sources.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::process::Command;

/// Source of diff input.
pub enum DiffSource {
    /// Diff read from a file.
    File(std::path::PathBuf),

    /// Diff from stdin.
    Stdin,

    /// Diff between git refs.
    GitDiff { from: String, to: String },
}

impl DiffSource {
    /// Human-readable revision-range label persisted with the run.
    pub fn range_label(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::Stdin => "stdin".to_string(),
            Self::GitDiff { from, to } => format!("{from}..{to}"),
        }
    }
}

/// Acquire diff text from a source.
pub fn acquire_diff(source: &DiffSource) -> Result<String> {
    match source {
        DiffSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff file {}", path.display())),

        DiffSource::Stdin => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("No diff on stdin; pass --diff <file> or --from/--to refs");
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }

        DiffSource::GitDiff { from, to } => {
            let git_path = which::which("git").context("Could not find 'git' executable")?;
            let output = Command::new(git_path)
                .args(["diff", from, to])
                .output()
                .context("Failed to run git diff")?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.contains("unknown revision") {
                    anyhow::bail!(
                        "Could not find reference '{}' or '{}'. Run `git branch -a` to see available refs.",
                        from,
                        to
                    );
                }
                anyhow::bail!("git diff failed: {}", stderr);
            }

            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
    }
}
