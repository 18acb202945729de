// System status display — store location, counts per status, last run.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::SubmissionStore;

/// Display system status to the terminal.
pub async fn show(store: &Arc<dyn SubmissionStore>, db_display_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(Path::new(db_display_path))
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let counts = store.status_counts().await?;
    println!(
        "Questions: {} pending, {} approved, {} rejected",
        counts.pending, counts.approved, counts.rejected
    );

    match store.last_run().await? {
        Some(run) => {
            println!(
                "Last run: {} ({} processed, {} approved, {} rejected, {} failed)",
                run.finished_at, run.total, run.approved, run.rejected, run.failed
            );
        }
        None => {
            println!("Last run: never");
            println!("  Run `askguard moderate` to process pending questions");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
