//! CLI command implementations

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::backend::{build_backend, VoiceOptions};
use crate::chat::ChatStore;
use crate::cli::args::{ConfigCommand, ExportFormat};
use crate::config::Settings;
use crate::interview::{
    render_transcript, Difficulty, InterviewCoach, InterviewSession, InterviewStats,
    InterviewStore, StoreOptions,
};
use crate::jobs::{rank_jobs, JobPosting};
use crate::profile::{ProfileStore, UserProfile};
use crate::resume::{ResumeAnalyzer, ResumeParser};
use crate::storage::Database;

fn open_interview_store(settings: &Settings) -> Result<InterviewStore> {
    let db = Database::open(settings)?;
    Ok(InterviewStore::open(
        Box::new(db),
        StoreOptions::from(&settings.interview),
    ))
}

fn find_session<'a>(store: &'a InterviewStore, id: &str) -> Result<&'a InterviewSession> {
    store
        .find_session_by_prefix(id)
        .with_context(|| format!("Interview not found: {}", id))
}

/// Run a practice interview against stdin
pub async fn practice(
    settings: &Settings,
    role: &str,
    company: &str,
    difficulty: Option<Difficulty>,
    questions: usize,
    no_voice: bool,
) -> Result<()> {
    let backend = build_backend(settings)?;
    let store = open_interview_store(settings)?;
    let voice = VoiceOptions {
        voice: settings.interview.voice.clone(),
        speed: settings.interview.voice_speed,
    };
    let mut coach = InterviewCoach::new(store, backend, voice)?;

    let difficulty = difficulty.unwrap_or(settings.interview.default_difficulty);
    let voice_enabled = settings.interview.voice_enabled && !no_voice;
    let id = coach.begin(role, company, difficulty, voice_enabled);

    println!(
        "Practice interview: {} at {} ({}, {})",
        role,
        company,
        difficulty,
        &id[..8.min(id.len())]
    );
    println!("Answer each question on a single line. End input to finish early.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for number in 1..=questions {
        let Some(question) = coach.ask_next_question().await? else {
            println!("No more questions available.");
            break;
        };

        println!();
        println!("Q{}: {}", number, question.text);
        for tip in &question.tips {
            println!("  tip: {}", tip);
        }

        let asked_at = Instant::now();
        let Some(answer) = lines.next_line().await? else {
            break;
        };
        let evaluation = coach
            .submit_answer(&answer, Some(asked_at.elapsed().as_secs_f64()))
            .await?;

        println!("  score: {:.1}  {}", evaluation.score, evaluation.feedback);
    }

    let summary = coach.finish().await?;
    let session = &summary.session;

    println!();
    println!("Interview complete: {}", session.short_id());
    println!(
        "Overall: {:.1} ({})  answered {} of {}",
        session.scores.overall,
        summary.level,
        session.metrics.questions_answered,
        session.metrics.total_questions
    );
    println!();
    println!("{}", summary.summary);

    print_list("Strengths", &session.feedback.strengths);
    print_list("To improve", &session.feedback.improvements);
    print_list("Suggestions", &session.feedback.suggestions);

    Ok(())
}

/// List completed interviews
pub fn list_history(settings: &Settings, limit: usize) -> Result<()> {
    let store = open_interview_store(settings)?;
    let sessions = &store.history().sessions;

    if sessions.is_empty() {
        println!("No interviews found");
        return Ok(());
    }

    println!(
        "{:<10} {:<24} {:<16} {:<8} {:<12} {:>6}",
        "ID", "Role", "Company", "Level", "Date", "Score"
    );
    println!("{}", "-".repeat(80));

    for session in sessions.iter().take(limit) {
        println!(
            "{:<10} {:<24} {:<16} {:<8} {:<12} {:>6.1}",
            session.short_id(),
            truncate(&session.role, 22),
            truncate(&session.company, 14),
            session.difficulty,
            session.start_time.format("%Y-%m-%d"),
            session.scores.overall
        );
    }

    Ok(())
}

/// Show one interview with its transcript
pub fn show_session(settings: &Settings, id: &str) -> Result<()> {
    let store = open_interview_store(settings)?;
    let session = find_session(&store, id)?;

    print!("{}", export_as_txt(session));
    Ok(())
}

/// Print aggregate statistics
pub fn show_progress(settings: &Settings, json: bool) -> Result<()> {
    let store = open_interview_store(settings)?;
    let stats = store.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&stats, store.history().improvement_trend);
    Ok(())
}

fn print_stats(stats: &InterviewStats, last_change: f64) {
    if stats.total_interviews == 0 {
        println!("No interviews yet. Run `alchemist practice` to start.");
        return;
    }

    println!("Interviews:        {}", stats.total_interviews);
    println!("Average score:     {:.1}", stats.average_score);
    println!("Best score:        {:.1}", stats.best_score);
    println!("Answers given:     {}", stats.total_questions_answered);
    println!("Practice time:     {} min", stats.total_practice_minutes);
    println!("Last change:       {:+.1}%", last_change);
    println!(
        "Trend:             {} ({:+.1}%)",
        stats.progress.trend.as_str(),
        stats.progress.improvement
    );

    if !stats.by_difficulty.is_empty() {
        println!();
        println!("By difficulty:");
        for (difficulty, entry) in &stats.by_difficulty {
            println!(
                "  {:<8} {:>3} interviews, average {:.1}",
                difficulty, entry.count, entry.average_score
            );
        }
    }

    if !stats.recent_scores.is_empty() {
        println!();
        println!("Recent scores:");
        for point in &stats.recent_scores {
            let date = point
                .completed_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  {}  {:>5.1}", date, point.score);
        }
    }
}

/// Export an interview to a file or stdout
pub fn export_session(
    settings: &Settings,
    id: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let store = open_interview_store(settings)?;
    let session = find_session(&store, id)?;

    let content = match format {
        ExportFormat::Txt => export_as_txt(session),
        ExportFormat::Json => serde_json::to_string_pretty(session)? + "\n",
    };

    if let Some(path) = output {
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to: {}", path.display());
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Report completion of a profile JSON file
pub fn profile_completion(settings: &Settings, file: &Path) -> Result<()> {
    let profile: UserProfile = read_json(file, "profile")?;

    let mut store = ProfileStore::new(build_backend(settings)?);
    let missing = profile.missing_fields();
    store.set_profile(profile);

    println!("Profile completion: {}%", store.completion());
    if !missing.is_empty() {
        println!("Missing: {}", missing.join(", "));
    }

    Ok(())
}

/// Send one message to the career assistant
pub async fn chat(settings: &Settings, message: &str) -> Result<()> {
    let mut chat = ChatStore::new(build_backend(settings)?);
    let reply = chat.send(message).await?;
    println!("{}", reply);
    Ok(())
}

/// Score a plain-text resume offline, then ask the backend for a written review
pub async fn review_resume(
    settings: &Settings,
    file: &Path,
    role: Option<&str>,
    keywords: &[String],
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read resume: {}", file.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("Resume is empty: {}", file.display());
    }

    let parsed = ResumeParser::new()?.parse(&text);
    let analysis = ResumeAnalyzer::new()?.analyze(&parsed, keywords)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("ATS score: {:.1}/100", analysis.overall_score);
    println!("  Format:     {:.1}", analysis.format_score);
    println!("  Keywords:   {:.1}", analysis.keyword_score);
    println!("  Experience: {:.1}", analysis.experience_score);
    println!("  Education:  {:.1}", analysis.education_score);
    print_list("Strengths", &analysis.strengths);
    print_list("Weaknesses", &analysis.weaknesses);
    print_list("Suggestions", &analysis.suggestions);
    if !analysis.missing_keywords.is_empty() {
        println!();
        println!("Missing keywords: {}", analysis.missing_keywords.join(", "));
    }

    let review = match build_backend(settings) {
        Ok(backend) => ChatStore::new(backend).analyze_resume(&text, role).await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    println!();
    match review {
        Ok(review) => {
            println!("AI review:");
            println!("{}", review);
        }
        Err(e) => {
            warn!("Resume review request failed: {}", e);
            println!("AI review unavailable: {}", e);
        }
    }
    Ok(())
}

/// Rank job postings from a JSON file by skill overlap with a profile
pub fn match_jobs(profile_file: &Path, jobs_file: &Path, json: bool) -> Result<()> {
    let profile: UserProfile = read_json(profile_file, "profile")?;
    let jobs: Vec<JobPosting> = read_json(jobs_file, "job postings")?;

    let ranked = rank_jobs(&profile, &jobs);
    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No active job postings to match.");
        return Ok(());
    }

    for entry in &ranked {
        println!(
            "{:>5.1}%  {} at {}",
            entry.skills.match_percentage,
            truncate(&entry.job.title, 40),
            entry.job.company
        );
        if !entry.skills.missing.is_empty() {
            println!("        missing: {}", entry.skills.missing.join(", "));
        }
    }
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn read_json<T: DeserializeOwned>(file: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}: {}", what, file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}: {}", what, file.display()))
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn export_as_txt(session: &InterviewSession) -> String {
    let mut output = String::new();
    output.push_str(&format!("Interview: {} at {}\n", session.role, session.company));
    output.push_str(&format!("ID: {}\n", session.id));
    output.push_str(&format!(
        "Date: {}\n",
        session.start_time.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("Difficulty: {}\n", session.difficulty));
    output.push_str(&format!("Status: {}\n", session.status));
    if let Some(minutes) = session.duration_minutes() {
        output.push_str(&format!("Duration: {} min\n", minutes));
    }
    output.push_str(&format!(
        "Scores: overall {:.1}, technical {:.1}, communication {:.1}, problem solving {:.1}, behavioral {:.1}\n",
        session.scores.overall,
        session.scores.technical,
        session.scores.communication,
        session.scores.problem_solving,
        session.scores.behavioral
    ));
    output.push_str(&format!(
        "Answered: {} of {} (avg response {:.1}s)\n",
        session.metrics.questions_answered,
        session.metrics.total_questions,
        session.metrics.average_response_time
    ));
    output.push_str("\n---\n\n");

    if session.messages.is_empty() {
        output.push_str("(No transcript)\n");
    } else {
        output.push_str(&render_transcript(session));
        output.push('\n');
    }

    output
}
