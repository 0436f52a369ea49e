use super::super::DbConn;
use crate::domain::{Category, Finding, PrId, ReviewError, ReviewRun, ReviewRunId, Severity};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::str::FromStr;

/// Append-only store of review runs, keyed by PR id.
///
/// Runs are inserted once and never updated; attempting to re-save an
/// existing run id fails with `ReviewError::DuplicateRun`.
pub struct ReviewRunRepository {
    conn: DbConn,
}

impl ReviewRunRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Persist a run and its findings in one transaction.
    pub fn save(&self, run: &ReviewRun) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let exists: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM review_runs WHERE id = ?1)",
                [&run.id],
                |row| row.get(0),
            )
            .context("Failed to check for existing run")?;
        if exists {
            return Err(ReviewError::DuplicateRun(run.id.clone()).into());
        }

        tx.execute(
            r#"
            INSERT INTO review_runs (id, pr_id, diff_range, diff_hash, dropped, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            (
                &run.id,
                &run.pr_id,
                &run.diff_range,
                &run.diff_hash,
                run.dropped,
                &run.created_at,
            ),
        )?;

        for (ordinal, finding) in run.findings.iter().enumerate() {
            let context_json = serde_json::to_string(&finding.context)?;
            tx.execute(
                r#"
                INSERT INTO findings (
                    id, run_id, ordinal, fingerprint, category, severity,
                    title, file, line_start, line_end, symbol,
                    explanation, suggestion, patch, context_json
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
                rusqlite::params![
                    &finding.id,
                    &run.id,
                    ordinal as i64,
                    &finding.fingerprint,
                    finding.category.to_string(),
                    finding.severity.to_string(),
                    &finding.title,
                    &finding.file,
                    finding.line_start,
                    finding.line_end,
                    &finding.symbol,
                    &finding.explanation,
                    &finding.suggestion,
                    &finding.patch,
                    context_json,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Most recent run for a PR, with findings loaded, if any.
    pub fn latest(&self, pr_id: &str) -> Result<Option<ReviewRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, pr_id, diff_range, diff_hash, dropped, created_at
            FROM review_runs WHERE pr_id = ?1
            ORDER BY created_at DESC, id DESC LIMIT 1
            "#,
        )?;
        let mut rows = stmt.query_map([pr_id], |row| {
            Ok(ReviewRun {
                id: row.get::<_, ReviewRunId>(0)?,
                pr_id: row.get(1)?,
                diff_range: row.get(2)?,
                diff_hash: row.get(3)?,
                findings: Vec::new(),
                dropped: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let Some(run) = rows.next().transpose()? else {
            return Ok(None);
        };
        let mut run = run;
        run.findings = Self::findings_for(&conn, &run.id)?;
        Ok(Some(run))
    }

    /// All runs for a PR, newest first, without findings loaded.
    pub fn list(&self, pr_id: &PrId) -> Result<Vec<ReviewRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, pr_id, diff_range, diff_hash, dropped, created_at
            FROM review_runs WHERE pr_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map([pr_id], |row| {
            Ok(ReviewRun {
                id: row.get(0)?,
                pr_id: row.get(1)?,
                diff_range: row.get(2)?,
                diff_hash: row.get(3)?,
                findings: Vec::new(),
                dropped: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Findings for one run, in report order.
    pub fn findings(&self, run_id: &ReviewRunId) -> Result<Vec<Finding>> {
        let conn = self.conn.lock().unwrap();
        Self::findings_for(&conn, run_id)
    }

    fn findings_for(conn: &Connection, run_id: &str) -> Result<Vec<Finding>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, fingerprint, category, severity, title, file,
                   line_start, line_end, symbol, explanation, suggestion,
                   patch, context_json
            FROM findings WHERE run_id = ?1 ORDER BY ordinal ASC
            "#,
        )?;

        struct Row {
            id: String,
            fingerprint: String,
            category: String,
            severity: String,
            title: String,
            file: String,
            line_start: u32,
            line_end: u32,
            symbol: Option<String>,
            explanation: String,
            suggestion: String,
            patch: Option<String>,
            context_json: String,
        }

        let rows = stmt.query_map([run_id], |row| {
            Ok(Row {
                id: row.get(0)?,
                fingerprint: row.get(1)?,
                category: row.get(2)?,
                severity: row.get(3)?,
                title: row.get(4)?,
                file: row.get(5)?,
                line_start: row.get(6)?,
                line_end: row.get(7)?,
                symbol: row.get(8)?,
                explanation: row.get(9)?,
                suggestion: row.get(10)?,
                patch: row.get(11)?,
                context_json: row.get(12)?,
            })
        })?;

        let mut findings = Vec::new();
        for row in rows {
            let row = row?;
            findings.push(Finding {
                id: row.id,
                category: Category::from_str(&row.category)
                    .map_err(anyhow::Error::msg)
                    .context("Corrupt category in findings table")?,
                severity: Severity::from_str(&row.severity)
                    .map_err(anyhow::Error::msg)
                    .context("Corrupt severity in findings table")?,
                title: row.title,
                file: row.file,
                line_start: row.line_start,
                line_end: row.line_end,
                symbol: row.symbol,
                explanation: row.explanation,
                suggestion: row.suggestion,
                patch: row.patch,
                context: serde_json::from_str(&row.context_json)
                    .context("Corrupt context_json in findings table")?,
                fingerprint: row.fingerprint,
            });
        }
        Ok(findings)
    }
}
