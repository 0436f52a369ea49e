//! Subprocess-backed reviewer collaborator.
//!
//! Spawns a configured executable, writes the normalized changeset and
//! ruleset as JSON to its stdin, and reads raw findings as JSON from its
//! stdout. The call is bounded by a timeout; on timeout or failure the run
//! aborts and nothing is persisted.

use super::{RawFinding, ReviewAgent};
use crate::domain::{FileDiff, ResolvedRule, ReviewError};
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Serialize)]
struct AgentRequest<'a> {
    files: &'a [FileDiff],
    rules: &'a [ResolvedRule],
}

/// Reviewer that shells out to an external command.
pub struct CommandAgent {
    id: String,
    program: std::path::PathBuf,
    args: Vec<String>,
    timeout_secs: u64,
}

impl CommandAgent {
    /// Resolve `program` on PATH and build the agent.
    pub fn new(program: &str, args: Vec<String>, timeout_secs: u64) -> Result<Self, ReviewError> {
        let resolved = which::which(program).map_err(|_| {
            ReviewError::CollaboratorFailed(format!("reviewer command not found: {program}"))
        })?;
        Ok(Self {
            id: program.to_string(),
            program: resolved,
            args,
            timeout_secs,
        })
    }
}

#[async_trait]
impl ReviewAgent for CommandAgent {
    fn id(&self) -> &str {
        &self.id
    }

    async fn review(
        &self,
        files: &[FileDiff],
        rules: &[ResolvedRule],
    ) -> Result<Vec<RawFinding>, ReviewError> {
        let payload = serde_json::to_vec(&AgentRequest { files, rules })
            .map_err(|err| ReviewError::CollaboratorFailed(err.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                ReviewError::CollaboratorFailed(format!(
                    "failed to spawn {}: {err}",
                    self.program.display()
                ))
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|err| ReviewError::CollaboratorFailed(err.to_string()))?;
        }
        drop(child.stdin.take());

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ReviewError::CollaboratorTimeout(self.timeout_secs))?
        .map_err(|err| ReviewError::CollaboratorFailed(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReviewError::CollaboratorFailed(format!(
                "reviewer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice::<Vec<RawFinding>>(&output.stdout).map_err(|err| {
            ReviewError::CollaboratorFailed(format!("unparseable reviewer output: {err}"))
        })
    }
}
