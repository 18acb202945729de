// Database schema — table creation.
//
// A `schema_version` table records the schema revision so later changes
// can be applied to existing files.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent, so it is safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Submitted questions and their moderation outcome
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,               -- opaque random hex id
            name TEXT NOT NULL,                -- author display name
            question TEXT NOT NULL,            -- raw text as submitted
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected')),
            rejection_reason TEXT,             -- comma-joined reasons
            toxicity_score REAL,               -- 0.0 to 1.0, only if scored
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            processed_at TEXT
        );

        -- The batch query selects on status
        CREATE INDEX IF NOT EXISTS idx_questions_status
            ON questions(status, created_at);

        -- One row per completed moderation run
        CREATE TABLE IF NOT EXISTS moderation_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NOT NULL,
            total INTEGER NOT NULL,
            approved INTEGER NOT NULL,
            rejected INTEGER NOT NULL,
            failed INTEGER NOT NULL
        );
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the user tables in the database (shown by `askguard init`).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1]);
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, questions, moderation_runs
        assert_eq!(table_count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO questions (id, name, question, status) VALUES ('x', 'a', 'q', 'maybe')",
            [],
        );
        assert!(result.is_err());
    }
}
