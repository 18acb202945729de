use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use askguard::config::Config;
use askguard::db::sqlite::SqliteStore;
use askguard::filter::LocalFilter;
use askguard::output::terminal;
use askguard::pipeline::Moderator;
use askguard::toxicity::gate::ToxicityGate;
use askguard::toxicity::perspective::PerspectiveScorer;

/// Askguard: screens submitted questions before they reach the public Q&A display.
///
/// Rejects spam, profanity, obfuscated slurs, injected links/markup and
/// toxic content, and records why.
#[derive(Parser)]
#[command(name = "askguard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the question store
    Init,

    /// Moderate every pending question once
    Moderate {
        /// Print the run summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the local filter on a piece of text (no network, no store)
    Check {
        /// The question text to check
        text: String,
    },

    /// List approved questions
    Approved,

    /// Show store status (counts per status, last run)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("askguard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing question store...");
            let config = Config::load()?;
            let conn = askguard::db::initialize(&config.db_path)?;
            let store = SqliteStore::new(conn);
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext: set PERSPECTIVE_API_KEY in your .env file, then run `askguard moderate`.");
        }

        Commands::Moderate { json } => {
            let config = Config::load()?;
            config.require_perspective()?;
            let store = askguard::db::open_sqlite(&config.db_path)?;

            let scorer = PerspectiveScorer::new(
                config.perspective_api_key.clone(),
                config.scorer_timeout,
            )?
            .with_endpoint(&config.perspective_url)
            .with_languages(config.perspective_languages.clone());

            let gate = ToxicityGate::new(
                Arc::new(scorer),
                config.toxicity_threshold,
                config.scorer_timeout,
            );

            info!(threshold = gate.threshold(), "Starting moderation run");

            let moderator = Moderator::new(
                store,
                LocalFilter::new(&config.filter),
                gate,
                config.moderation,
            )
            .with_progress(!json && std::io::stderr().is_terminal());

            let summary = moderator.run_batch().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                terminal::display_run_summary(&summary);
            }

            if summary.has_failures() {
                anyhow::bail!(
                    "{} of {} decisions could not be saved",
                    summary.failed,
                    summary.total
                );
            }
        }

        Commands::Check { text } => {
            let config = Config::load()?;
            let filter = LocalFilter::new(&config.filter);
            let verdict = filter.check(&text);
            terminal::display_verdict(&text, &verdict);
        }

        Commands::Approved => {
            let config = Config::load()?;
            let store = askguard::db::open_sqlite(&config.db_path)?;
            let approved = store.approved_questions().await?;
            terminal::display_approved(&approved);
        }

        Commands::Status => {
            let config = Config::load()?;
            if Path::new(&config.db_path).exists() {
                let store = askguard::db::open_sqlite(&config.db_path)?;
                askguard::status::show(&store, &config.db_path).await?;
            } else {
                println!("Database: not initialized");
                println!(
                    "\n{}",
                    "Run `askguard init` to set up the database.".dimmed()
                );
            }
        }
    }

    Ok(())
}
