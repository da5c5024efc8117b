use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod average;
mod db;
mod error;
mod improvement;
mod logging;
mod models;
mod report;
mod scheme;
mod store;
mod submission;

use crate::db::PgGradeStore;
use crate::scheme::Scheme;
use crate::store::{GradeStore, DEFAULT_HISTORY_LIMIT};

#[derive(Parser)]
#[command(name = "grade-tracker")]
#[command(about = "Weighted grade average calculator with history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Compute the weighted average for a full set of scores
    Calc {
        /// Subject score as NAME=VALUE, between 0 and 20
        #[arg(long = "score", value_name = "NAME=VALUE")]
        scores: Vec<String>,
        /// Coefficient override as NAME=COEF, between 1 and 10
        #[arg(long = "coef", value_name = "NAME=COEF")]
        coefs: Vec<String>,
        /// JSON file describing subjects and coefficients
        #[arg(long)]
        scheme: Option<PathBuf>,
        /// Treat subjects without a score as 0
        #[arg(long)]
        missing_as_zero: bool,
        /// Skip saving the result to history
        #[arg(long)]
        no_save: bool,
        /// Export the result as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        suggestions: usize,
    },
    /// Show recent calculations
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: i64,
    },
    /// Generate a markdown history report
    Report {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: i64,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set to a Postgres instance")
}

async fn open_store() -> anyhow::Result<PgGradeStore> {
    Ok(PgGradeStore::new(db::connect(&database_url()?).await?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing_subscriber();
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = db::connect(&database_url()?).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Calc {
            scores,
            coefs,
            scheme,
            missing_as_zero,
            no_save,
            csv,
            suggestions,
        } => {
            let base = match scheme {
                Some(path) => Scheme::load(&path)?,
                None => Scheme::default(),
            };
            let scheme = base.with_overrides(&coefs)?;
            let entries = scheme.assign_scores(&scores, missing_as_zero)?;

            let record = if no_save {
                submission::build_record(entries)?
            } else {
                let store = open_store().await?;
                submission::submit(&store, entries).await?
            };

            println!("Weighted average: {:.2}", record.weighted_average);

            let ranked = improvement::rank_improvements(&record.entries, record.weighted_average)?;
            if ranked.is_empty() {
                println!("Every subject is already at the maximum.");
            } else if suggestions > 0 {
                println!("To improve your average the most, focus on:");
                for suggestion in ranked.iter().take(suggestions) {
                    println!(
                        "- {} (grade {:.1}, coef {}): +{:.3} per extra point",
                        suggestion.name, suggestion.score, suggestion.coefficient, suggestion.gain
                    );
                }
            }

            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                report::export_csv(&record, file)?;
                println!("CSV written to {}.", path.display());
            }
        }
        Commands::History { limit } => {
            let store = open_store().await?;
            let records = store.list_recent(limit).await?;

            if records.is_empty() {
                println!("No history available yet.");
                return Ok(());
            }

            println!("Recent calculations:");
            for record in &records {
                let scores: Vec<String> = record
                    .entries
                    .iter()
                    .map(|entry| format!("{} {:.1}", entry.name, entry.score))
                    .collect();
                println!(
                    "- {} average {:.2}: {}",
                    record.calculated_at.format("%Y-%m-%d %H:%M"),
                    record.weighted_average,
                    scores.join(", ")
                );
            }
        }
        Commands::Report { limit, out } => {
            let store = open_store().await?;
            let records = store.list_recent(limit).await?;
            let report = report::build_report(&records);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
