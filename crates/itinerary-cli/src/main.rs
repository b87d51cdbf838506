//! `itinerary` CLI: auto-fill trips, analyze days and sync suggestions from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Distribute saved places over a 3-day trip (stdin → stdout)
//! cat candidates.json | itinerary autofill --days 3 --pace relaxed
//!
//! # Suggest fixes for one day
//! itinerary analyze -i day.json --pace packed
//!
//! # Analyze a day and reconcile with its pending suggestions
//! itinerary reconcile -i request.json
//!
//! # List the calendar days of a trip
//! itinerary days --arriving 2026-03-12 --leaving 2026-03-15
//! ```

mod settings;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use itinerary_engine::reconcile::{Suggestion, SyncOutcome};
use itinerary_engine::timeline::generate_trip_days;
use itinerary_engine::{
    analyze_day, build_itinerary, sync_suggestions, Candidate, Day, MemorySuggestionStore, Pace,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "itinerary",
    version,
    about = "Trip itinerary auto-fill and schedule suggestions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML settings file
    #[arg(long, global = true, env = "ITINERARY_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Distribute candidate places across trip days
    Autofill {
        /// Candidates JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Number of days in the trip
        #[arg(long)]
        days: usize,
        /// relaxed, balanced or packed
        #[arg(long)]
        pace: Option<Pace>,
    },
    /// Suggest fixes for a single day's schedule
    Analyze {
        /// Day JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// relaxed, balanced or packed
        #[arg(long)]
        pace: Option<Pace>,
    },
    /// Analyze a day and reconcile with its pending suggestions
    Reconcile {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the calendar days between arrival and departure
    Days {
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        arriving: NaiveDate,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        leaving: NaiveDate,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Input of `itinerary reconcile`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileRequest {
    trip_id: String,
    day: Day,
    #[serde(default)]
    pace: Option<Pace>,
    #[serde(default)]
    pending: Vec<Suggestion>,
}

/// Output of `itinerary reconcile`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileReport {
    outcome: SyncOutcome,
    /// Every suggestion after the sync, including dismissed ones.
    suggestions: Vec<Suggestion>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_logging(&settings.log_level);
    let pretty = cli.pretty || settings.pretty;

    match cli.command {
        Commands::Autofill {
            input,
            output,
            days,
            pace,
        } => {
            let raw = read_input(input.as_deref())?;
            let candidates: Vec<Candidate> =
                serde_json::from_str(&raw).context("Failed to parse candidates JSON")?;
            let pace = pace.unwrap_or(settings.default_pace);

            let plan = build_itinerary(&candidates, days, pace);
            if !plan.overflow.is_empty() {
                tracing::info!(overflow = plan.overflow.len(), "some places did not fit");
            }
            write_json(output.as_deref(), &plan, pretty)?;
        }
        Commands::Analyze {
            input,
            output,
            pace,
        } => {
            let raw = read_input(input.as_deref())?;
            let day: Day = serde_json::from_str(&raw).context("Failed to parse day JSON")?;

            let candidates = analyze_day(&day, pace);
            write_json(output.as_deref(), &candidates, pretty)?;
        }
        Commands::Reconcile { input, output } => {
            let raw = read_input(input.as_deref())?;
            let request: ReconcileRequest =
                serde_json::from_str(&raw).context("Failed to parse reconcile request JSON")?;

            let fresh = analyze_day(&request.day, request.pace);
            let store = MemorySuggestionStore::with_suggestions(request.pending);
            let outcome = sync_suggestions(&store, &request.trip_id, &request.day.id, &fresh)
                .await
                .context("Failed to sync suggestions")?;

            let report = ReconcileReport {
                outcome,
                suggestions: store.all().await,
            };
            write_json(output.as_deref(), &report, pretty)?;
        }
        Commands::Days {
            arriving,
            leaving,
            output,
        } => {
            let days = generate_trip_days(arriving, leaving)?;
            write_json(output.as_deref(), &days, pretty)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays valid JSON. `RUST_LOG` wins over settings.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T, pretty: bool) -> Result<()> {
    let mut content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    content.push('\n');

    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
