//! alchemist - Mock interviews, progress tracking and career tooling
//!
//! Entry point for the alchemist CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alchemist::cli::{commands, Cli, Commands};
use alchemist::config::Settings;

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            alchemist::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;
            let level = if cli.verbose {
                "debug"
            } else {
                settings.general.log_level.as_str()
            };
            init_logging(level);
            settings.ensure_dirs()?;

            match command {
                Commands::Practice {
                    role,
                    company,
                    difficulty,
                    questions,
                    no_voice,
                } => {
                    commands::practice(&settings, &role, &company, difficulty, questions, no_voice)
                        .await?;
                }
                Commands::History { limit } => {
                    commands::list_history(&settings, limit)?;
                }
                Commands::Show { id } => {
                    commands::show_session(&settings, &id)?;
                }
                Commands::Progress { json } => {
                    commands::show_progress(&settings, json)?;
                }
                Commands::Export { id, format, output } => {
                    commands::export_session(&settings, &id, format, output)?;
                }
                Commands::Profile { file } => {
                    commands::profile_completion(&settings, &file)?;
                }
                Commands::Chat { message } => {
                    commands::chat(&settings, &message).await?;
                }
                Commands::Resume {
                    file,
                    role,
                    keywords,
                    json,
                } => {
                    commands::review_resume(&settings, &file, role.as_deref(), &keywords, json)
                        .await?;
                }
                Commands::Match {
                    profile,
                    jobs,
                    json,
                } => {
                    commands::match_jobs(&profile, &jobs, json)?;
                }
                Commands::Config(config_cmd) => {
                    commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => {}
            }
        }
    }

    Ok(())
}
