//! Validation and splitting of raw reviewer output.

use crate::domain::{Category, Finding, FileDiff, ReviewError, Severity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unchanged context lines captured on each side of a finding's range.
const CONTEXT_RADIUS: u32 = 3;

/// One unvalidated finding as emitted by the reviewer collaborator.
///
/// All fields are permissive; validation decides what survives. A raw
/// finding may name several files and is split into one `Finding` per file
/// so the severity policy only ever sees single-file findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFinding {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Single-file form.
    #[serde(default)]
    pub file: Option<String>,
    /// Multi-file form; merged with `file` during splitting.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub line_start: Option<u32>,
    #[serde(default)]
    pub line_end: Option<u32>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
}

/// Validate raw findings against the normalized changeset.
///
/// Invalid records are dropped with a logged warning and counted; a bad
/// finding never fails the run. Returns the surviving findings and the
/// number dropped.
pub fn validate_findings(raw: Vec<RawFinding>, files: &[FileDiff]) -> (Vec<Finding>, u32) {
    let mut findings = Vec::new();
    let mut dropped = 0u32;

    for record in raw {
        match split_and_validate(record, files) {
            Ok(mut split) => findings.append(&mut split),
            Err(err) => {
                log::warn!("Dropping reviewer finding: {err}");
                dropped += 1;
            }
        }
    }

    (findings, dropped)
}

fn split_and_validate(
    record: RawFinding,
    files: &[FileDiff],
) -> Result<Vec<Finding>, ReviewError> {
    let category = record
        .category
        .as_deref()
        .ok_or_else(|| ReviewError::InvalidFinding("missing category".to_string()))
        .and_then(|s| {
            Category::from_str(s).map_err(ReviewError::InvalidFinding)
        })?;

    let severity = record
        .severity
        .as_deref()
        .ok_or_else(|| ReviewError::InvalidFinding("missing severity".to_string()))
        .and_then(|s| {
            Severity::from_str(s).map_err(ReviewError::InvalidFinding)
        })?;

    let title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ReviewError::InvalidFinding("missing title".to_string()))?
        .to_string();

    let mut paths: Vec<String> = record.files.clone();
    if let Some(file) = &record.file
        && !paths.contains(file)
    {
        paths.insert(0, file.clone());
    }
    if paths.is_empty() {
        return Err(ReviewError::InvalidFinding("missing file".to_string()));
    }

    let line_start = record
        .line_start
        .filter(|l| *l > 0)
        .ok_or_else(|| ReviewError::InvalidFinding("missing line_start".to_string()))?;
    let line_end = record.line_end.unwrap_or(line_start).max(line_start);

    let explanation = record.explanation.clone().unwrap_or_default();
    let suggestion = record.suggestion.clone().unwrap_or_default();

    let mut out = Vec::new();
    for path in paths {
        let context = files
            .iter()
            .find(|f| f.path == path)
            .and_then(|f| f.hunk_at_new_line(line_start))
            .map(|h| h.context_window(line_start, line_end, CONTEXT_RADIUS))
            .unwrap_or_default();

        let fingerprint =
            Finding::fingerprint_of(category, &title, &path, record.symbol.as_deref());

        out.push(Finding {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            severity,
            title: title.clone(),
            file: path,
            line_start,
            line_end,
            symbol: record.symbol.clone(),
            explanation: explanation.clone(),
            suggestion: suggestion.clone(),
            patch: record.patch.clone(),
            context,
            fingerprint,
        });
    }

    Ok(out)
}
