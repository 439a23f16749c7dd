//! liftwise - Personal strength-training analytics
//!
//! Every command prints its result as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use liftwise::db::{Database, ExerciseInfo};
use liftwise::{Analytics, AnalysisConfig, SessionRecord};

#[derive(Parser)]
#[command(name = "liftwise")]
#[command(author, version, about = "Strength-training analytics for GymUp workout logs")]
struct Cli {
    /// GymUp database file
    #[arg(long, env = "GYMUP_DB", default_value = "workout.db")]
    db: PathBuf,

    /// JSON file with analysis settings
    #[arg(long, env = "GYMUP_CONFIG")]
    config: Option<PathBuf>,

    /// Override how many weeks of history to load
    #[arg(short, long)]
    weeks: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises that have been trained
    Exercises,

    /// Training totals: overall, last 7 and last 30 days
    Overview,

    /// Tonnage per muscle group over the lookback window
    Muscles,

    /// Trend, plateau and PR count
    Analyze {
        /// Exercise name or part of it (e.g., "bench")
        exercise: String,
    },

    /// Weight for the next session
    Suggest {
        exercise: String,

        /// Use the larger increment when reps are high
        #[arg(long)]
        aggressive: bool,
    },

    /// Projected 1RM
    Project {
        exercise: String,

        /// Weeks to project past the last session
        #[arg(short, long)]
        forward: Option<u32>,
    },

    /// Personal record history
    Records { exercise: String },

    /// Fatigue check
    Overreach { exercise: String },

    /// Weekly tonnage, sets and reps
    Volume { exercise: String },

    /// Everything above in one document
    Report { exercise: String },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())?;
    if let Some(weeks) = cli.weeks {
        config.lookback_weeks = weeks;
    }
    let db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Exercises => {
            print_json(&db.used_exercises()?)?;
        }

        Commands::Overview => {
            print_json(&db.overview_stats(Utc::now())?)?;
        }

        Commands::Muscles => {
            let since = config.history_since(Utc::now())?;
            print_json(&db.muscle_volume(since)?)?;
        }

        Commands::Analyze { exercise } => {
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "progression": analytics.progression() }))?;
        }

        Commands::Suggest { exercise, aggressive } => {
            if aggressive {
                config.conservative = false;
            }
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "suggestion": analytics.suggestion() }))?;
        }

        Commands::Project { exercise, forward } => {
            if let Some(weeks) = forward {
                config.weeks_forward = weeks;
            }
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "trajectory": analytics.trajectory() }))?;
        }

        Commands::Records { exercise } => {
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "records": analytics.records() }))?;
        }

        Commands::Overreach { exercise } => {
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "overreach": analytics.overreach() }))?;
        }

        Commands::Volume { exercise } => {
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "weekly_volume": analytics.weekly_volume() }))?;
        }

        Commands::Report { exercise } => {
            let (info, history) = load_history(&db, &config, &exercise)?;
            let analytics = Analytics::new(&history, &config);
            print_json(&json!({ "exercise": info, "report": analytics.report() }))?;
        }
    }

    Ok(())
}

/// Resolve the exercise by name and load its recent history
fn load_history(
    db: &Database,
    config: &AnalysisConfig,
    query: &str,
) -> Result<(ExerciseInfo, Vec<SessionRecord>)> {
    let Some(info) = db.find_exercise(query)? else {
        bail!("no trained exercise matches \"{}\"", query);
    };

    let since = config.history_since(Utc::now())?;
    let history = db
        .exercise_history(info.id, since)
        .with_context(|| format!("loading history for {}", info.name))?;
    if history.is_empty() {
        warn!(exercise = %info.name, weeks = config.lookback_weeks, "no sessions in lookback window");
    }

    Ok((info, history))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
