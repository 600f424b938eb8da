//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{carry_over, focus, habits, score};

/// Daily views over Atlas habits, tasks and learning time.
///
/// Reads from the Atlas REST API configured in `config.toml` or `ATLAS_*`
/// environment variables.
#[derive(Debug, Parser)]
#[command(name = "atlas", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the habit consistency calendar and current streak.
    Habits(habits::HabitsArgs),

    /// Show the daily life score and grade.
    Score(score::ScoreArgs),

    /// Show focus minutes per day.
    Focus(focus::FocusArgs),

    /// Copy yesterday's unfinished tasks onto today.
    CarryOver(carry_over::CarryOverArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["atlas", "score", "--date", "yesterday", "-v"]).unwrap();
        assert!(cli.verbose);
        let Some(Commands::Score(args)) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.date, "yesterday");
    }

    #[test]
    fn parses_carry_over_flags() {
        let cli = Cli::try_parse_from(["atlas", "carry-over", "--skip-duplicates"]).unwrap();
        let Some(Commands::CarryOver(args)) = cli.command else {
            panic!("expected carry-over command");
        };
        assert!(args.skip_duplicates);
        assert_eq!(args.date, "today");
    }

    #[test]
    fn habits_defaults_to_thirty_days() {
        let cli = Cli::try_parse_from(["atlas", "habits"]).unwrap();
        let Some(Commands::Habits(args)) = cli.command else {
            panic!("expected habits command");
        };
        assert_eq!(args.days, 30);
        assert!(!args.json);
    }
}
