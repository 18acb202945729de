// Database queries — every SQL statement the store runs lives here.
//
// Free functions over a borrowed Connection so they can be tested directly
// against an in-memory database.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{Decision, RunRecord, StatusCounts, Submission, SubmissionStatus};

const SUBMISSION_COLUMNS: &str =
    "id, name, question, status, rejection_reason, toxicity_score, created_at, processed_at";

fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    let status: String = row.get(3)?;
    let status = SubmissionStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown submission status '{status}'").into(),
        )
    })?;

    Ok(Submission {
        id: row.get(0)?,
        author: row.get(1)?,
        text: row.get(2)?,
        status,
        rejection_reason: row.get(4)?,
        toxicity_score: row.get(5)?,
        created_at: row.get(6)?,
        processed_at: row.get(7)?,
    })
}

// --- Submissions ---

/// Create a new pending submission and return its generated id.
pub fn insert_submission(conn: &Connection, author: &str, text: &str) -> Result<String> {
    let id: String = conn.query_row(
        "INSERT INTO questions (id, name, question, status)
         VALUES (lower(hex(randomblob(10))), ?1, ?2, 'pending')
         RETURNING id",
        params![author, text],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Every pending submission, oldest first.
pub fn get_pending_submissions(conn: &Connection) -> Result<Vec<Submission>> {
    let sql = format!(
        "SELECT {SUBMISSION_COLUMNS} FROM questions
         WHERE status = 'pending'
         ORDER BY created_at, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], submission_from_row)?;
    let submissions = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(submissions)
}

pub fn get_submission(conn: &Connection, id: &str) -> Result<Option<Submission>> {
    let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM questions WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(params![id], submission_from_row).optional()?;
    Ok(result)
}

/// Write the terminal decision for a submission.
///
/// Only a row that is still `pending` is updated, so a submission can
/// be decided at most once. Anything else is an error.
pub fn record_decision(conn: &Connection, id: &str, decision: &Decision) -> Result<()> {
    let changed = conn.execute(
        "UPDATE questions SET
            status = ?1,
            rejection_reason = ?2,
            toxicity_score = ?3,
            processed_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
         WHERE id = ?4 AND status = 'pending'",
        params![
            decision.status().as_str(),
            decision.rejection_reason(),
            decision.toxicity_score(),
            id,
        ],
    )?;

    if changed == 0 {
        let current: Option<String> = conn
            .query_row(
                "SELECT status FROM questions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match current {
            Some(status) => anyhow::bail!("Submission {id} is already {status}"),
            None => anyhow::bail!("Submission {id} not found"),
        }
    }
    Ok(())
}

/// `(author, question)` pairs for every approved submission, oldest first.
pub fn get_approved_questions(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT name, question FROM questions
         WHERE status = 'approved'
         ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    let approved = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(approved)
}

pub fn get_status_counts(conn: &Connection) -> Result<StatusCounts> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM questions GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        let status: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((status, count))
    })?;

    let mut counts = StatusCounts::default();
    for row in rows {
        let (status, count) = row?;
        let count = u64::try_from(count).context("negative status count")?;
        match SubmissionStatus::parse(&status) {
            Some(SubmissionStatus::Pending) => counts.pending = count,
            Some(SubmissionStatus::Approved) => counts.approved = count,
            Some(SubmissionStatus::Rejected) => counts.rejected = count,
            None => {}
        }
    }
    Ok(counts)
}

// --- Run log ---

pub fn insert_run(conn: &Connection, run: &RunRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO moderation_runs (started_at, finished_at, total, approved, rejected, failed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.started_at,
            run.finished_at,
            run.total,
            run.approved,
            run.rejected,
            run.failed,
        ],
    )?;
    Ok(())
}

pub fn get_last_run(conn: &Connection) -> Result<Option<RunRecord>> {
    let mut stmt = conn.prepare(
        "SELECT started_at, finished_at, total, approved, rejected, failed
         FROM moderation_runs ORDER BY id DESC LIMIT 1",
    )?;
    let result = stmt
        .query_row([], |row| {
            Ok(RunRecord {
                started_at: row.get(0)?,
                finished_at: row.get(1)?,
                total: row.get(2)?,
                approved: row.get(3)?,
                rejected: row.get(4)?,
                failed: row.get(5)?,
            })
        })
        .optional()?;
    Ok(result)
}
