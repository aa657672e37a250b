//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::interview::Difficulty;

/// alchemist - Mock interviews, progress tracking and career tooling
#[derive(Parser, Debug)]
#[command(name = "alchemist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a practice interview, reading one answer per line from stdin
    Practice {
        /// Role you are interviewing for
        #[arg(short, long)]
        role: String,

        /// Company you are interviewing with
        #[arg(short, long)]
        company: String,

        /// Question difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Number of questions to ask
        #[arg(short = 'n', long, default_value = "3")]
        questions: usize,

        /// Skip text-to-speech for this session
        #[arg(long)]
        no_voice: bool,
    },

    /// List completed interviews
    History {
        /// Maximum number of interviews to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show one interview with its transcript
    Show {
        /// Interview ID or prefix
        id: String,
    },

    /// Show score statistics and trend
    Progress {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export an interview
    Export {
        /// Interview ID or prefix
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "txt")]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report completion of a profile stored as JSON
    Profile {
        /// Path to the profile JSON file
        file: PathBuf,
    },

    /// Ask the career assistant a question
    Chat {
        /// Message to send
        message: String,
    },

    /// Score a plain-text resume and get written feedback
    Resume {
        /// Path to the resume text
        file: PathBuf,

        /// Role to tailor the review to
        #[arg(short, long)]
        role: Option<String>,

        /// Keywords to check instead of the built-in list (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Print the score breakdown as JSON and skip the written review
        #[arg(long)]
        json: bool,
    },

    /// Rank job postings by how well a profile's skills cover them
    Match {
        /// Path to the profile JSON file
        profile: PathBuf,

        /// Path to a JSON array of job postings
        jobs: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
