// Colored terminal output for moderation runs and filter checks.
//
// main.rs delegates all user-facing formatting here.

use colored::Colorize;

use super::truncate_chars;
use crate::db::models::SubmissionStatus;
use crate::filter::FilterVerdict;
use crate::pipeline::{ItemOutcome, RunSummary};

/// Display the end-of-run summary, one line per submission.
pub fn display_run_summary(summary: &RunSummary) {
    if summary.total == 0 {
        println!("No pending questions to moderate.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Moderation Summary ({} questions) ===", summary.total).bold()
    );
    println!();

    for item in &summary.items {
        match &item.outcome {
            ItemOutcome::Approved { toxicity_score } => {
                println!(
                    "  {} {:<22} toxicity {:.4}",
                    "approved".green(),
                    item.id,
                    toxicity_score
                );
            }
            ItemOutcome::RejectedLocal { reasons } => {
                let joined = reasons
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {} {:<22} {}", "rejected".red(), item.id, joined);
            }
            ItemOutcome::RejectedToxic { toxicity_score } => {
                println!(
                    "  {} {:<22} toxicity {:.4}",
                    "rejected".red(),
                    item.id,
                    toxicity_score
                );
            }
            ItemOutcome::WriteFailed { intended, error } => {
                println!(
                    "  {} {:<22} would be {}: {}",
                    "FAILED".red().bold(),
                    item.id,
                    intended,
                    truncate_chars(error, 80)
                );
            }
        }
    }

    println!();
    println!("  Total processed: {}", summary.total);
    println!("  Approved:        {}", summary.approved.to_string().green());
    println!("  Rejected:        {}", summary.rejected.to_string().red());
    if summary.failed > 0 {
        println!(
            "  {} {} decisions could not be saved and remain pending",
            "!!".red().bold(),
            summary.failed
        );
    }

    let decided = summary.approved + summary.rejected;
    if decided > 0 {
        let rate = summary.approved as f64 / decided as f64 * 100.0;
        println!("  Approval rate:   {rate:.1}%");
    }
}

/// Display the local-filter verdict for `check`.
pub fn display_verdict(text: &str, verdict: &FilterVerdict) {
    let preview = truncate_chars(text, 80);
    if verdict.is_clean() {
        println!("{} '{}'", "CLEAN".green().bold(), preview);
        println!(
            "{}",
            "Passes the local filter; the toxicity gate still runs during moderation.".dimmed()
        );
    } else {
        println!("{} '{}'", "NOT CLEAN".red().bold(), preview);
        for reason in &verdict.reasons {
            println!("  - {reason}");
        }
    }
}

/// Display approved questions as `author: question`.
pub fn display_approved(questions: &[(String, String)]) {
    if questions.is_empty() {
        println!("No questions with status '{}'.", SubmissionStatus::Approved);
        return;
    }
    println!(
        "{}",
        format!("Approved questions ({}):", questions.len()).bold()
    );
    for (author, question) in questions {
        println!("  {}: {}", author.cyan(), question);
    }
}
