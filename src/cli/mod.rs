pub mod demo;
pub mod plan;
pub mod render;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tripboard")]
#[command(
    author,
    version,
    about = "Plan trips on a board of days, with streamed itinerary suggestions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (defaults to ./tripboard.json5 or the user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream an itinerary suggestion for a trip (Ctrl-C stops it)
    Plan(PlanArgs),

    /// Run a sample board through a few drags
    Demo(DemoArgs),
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// Where the trip goes
    #[arg(short, long)]
    pub location: Option<String>,

    /// First day of the trip (YYYY-MM-DD or RFC 3339)
    #[arg(short, long, value_parser = parse_date)]
    pub start: Option<DateTime<Utc>>,

    /// Last day of the trip (YYYY-MM-DD or RFC 3339)
    #[arg(short, long, value_parser = parse_date)]
    pub end: Option<DateTime<Utc>>,

    /// Print the itinerary as JSON
    #[arg(long)]
    pub json: bool,

    /// Add the suggested lists to the sample board and print it
    #[arg(long)]
    pub apply: bool,
}

#[derive(Parser, Clone)]
pub struct DemoArgs {
    /// Print the final board as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parses a calendar date at midnight UTC, or a full RFC 3339 timestamp.
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected YYYY-MM-DD or an RFC 3339 timestamp: {e}"))
}
