//! Swing assessment CLI
//!
//! Scores swings, batted balls and whole sessions from JSON files without a
//! running service.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analyze, barrel, compare, contact, report};
use std::path::PathBuf;
use swing_lib::CompetitionLevel;
use tracing_subscriber::{fmt, EnvFilter};

/// Swing assessment CLI
#[derive(Parser)]
#[command(name = "swingscore")]
#[command(author, version, about = "Baseball swing assessment from keypoints and ball flight", long_about = None)]
pub struct Cli {
    /// Calibration JSON replacing the built-in tables
    #[arg(long, env = "SWINGSCORE_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    /// Competition level for barrel thresholds (pro, college, hs, youth)
    #[arg(long, short, env = "SWINGSCORE_LEVEL")]
    pub level: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Log engine activity to stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute metrics for one swing
    Analyze {
        /// Swing JSON file
        file: PathBuf,
    },

    /// Classify one batted ball
    Barrel {
        /// Exit velocity in mph
        #[arg(long)]
        ev: f64,

        /// Launch angle in degrees
        #[arg(long)]
        la: f64,

        /// The ball went foul
        #[arg(long)]
        foul: bool,
    },

    /// Summarize contact quality of a list of batted-ball events
    Contact {
        /// JSON file holding an array of events
        file: PathBuf,
    },

    /// Generate the assessment report of a session
    Report {
        /// Session JSON file
        file: PathBuf,

        /// Earlier sessions of the same athlete to compare against
        #[arg(long, num_args = 1..)]
        history: Vec<PathBuf>,

        /// Write the report JSON to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Compare two saved reports
    Compare {
        /// Current report JSON
        current: PathBuf,

        /// Previous report JSON
        previous: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        fmt()
            .compact()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let settings = config::Config::load()?;
    let format = cli.format.unwrap_or_else(|| settings.format());
    let level = cli
        .level
        .map(CompetitionLevel::from)
        .unwrap_or_else(|| settings.level());
    let calibration = commands::load_calibration(cli.calibration.as_deref())?;

    match cli.command {
        Commands::Analyze { file } => analyze::analyze_swing(&file, calibration, format)?,
        Commands::Barrel { ev, la, foul } => {
            barrel::classify(ev, la, !foul, level, calibration, format)?
        }
        Commands::Contact { file } => contact::summarize(&file, level, calibration, format)?,
        Commands::Report {
            file,
            history,
            output,
        } => report::generate(&file, &history, output.as_deref(), level, calibration, format)?,
        Commands::Compare { current, previous } => {
            compare::compare(&current, &previous, &calibration.comparison, format)?
        }
    }

    Ok(())
}
