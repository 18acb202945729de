// Submission store — SQLite persistence for questions and the run log.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever ASKGUARD_DB_PATH points
// (defaults to ./askguard.db).

pub mod models;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use traits::SubmissionStore;

#[cfg(feature = "sqlite")]
use anyhow::{Context, Result};
#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use std::path::Path;
#[cfg(feature = "sqlite")]
use std::sync::Arc;

/// Open (or create) the database and run migrations.
///
/// Called by `askguard init`.
#[cfg(feature = "sqlite")]
pub fn initialize(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing database (fails if it doesn't exist yet).
#[cfg(feature = "sqlite")]
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `askguard init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Picks up migrations added since the file was created
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing SQLite store behind the trait object the pipeline uses.
#[cfg(feature = "sqlite")]
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn SubmissionStore>> {
    let conn = open(db_path)?;
    Ok(Arc::new(sqlite::SqliteStore::new(conn)))
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("askguard-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_open_missing_database_points_at_init() {
        let path = scratch_path("missing.db");
        let err = open_sqlite(path.to_str().unwrap()).err().unwrap();
        assert!(err.to_string().contains("askguard init"));
    }

    #[test]
    fn test_open_corrupt_database_is_not_reported_as_missing() {
        let path = scratch_path("corrupt.db");
        std::fs::write(&path, "not a sqlite file ".repeat(64)).unwrap();

        let err = open_sqlite(path.to_str().unwrap()).err().unwrap();
        let _ = std::fs::remove_file(&path);

        let message = format!("{err:#}");
        assert!(!message.contains("not found"), "{message}");
        assert!(!message.contains("askguard init"), "{message}");
    }
}
