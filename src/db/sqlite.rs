// SqliteStore — rusqlite backend implementing SubmissionStore.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return;
// the guard never lives across an .await. The pending-set read can scan the
// whole table, so it runs on the blocking pool where a caller's deadline
// can give up on it.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Decision, RunRecord, StatusCounts, Submission};
use super::queries;
use super::traits::SubmissionStore;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn pending_submissions(&self) -> Result<Vec<Submission>> {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        tokio::task::spawn_blocking(move || queries::get_pending_submissions(&conn))
            .await
            .context("Pending-submission query panicked")?
    }

    async fn record_decision(&self, id: &str, decision: &Decision) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::record_decision(&conn, id, decision)
    }

    async fn insert_submission(&self, author: &str, text: &str) -> Result<String> {
        let conn = self.conn.lock().await;
        queries::insert_submission(&conn, author, text)
    }

    async fn get_submission(&self, id: &str) -> Result<Option<Submission>> {
        let conn = self.conn.lock().await;
        queries::get_submission(&conn, id)
    }

    async fn approved_questions(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().await;
        queries::get_approved_questions(&conn)
    }

    async fn status_counts(&self) -> Result<StatusCounts> {
        let conn = self.conn.lock().await;
        queries::get_status_counts(&conn)
    }

    async fn record_run(&self, run: &RunRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::insert_run(&conn, run)
    }

    async fn last_run(&self) -> Result<Option<RunRecord>> {
        let conn = self.conn.lock().await;
        queries::get_last_run(&conn)
    }
}
