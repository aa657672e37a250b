mod common;

use common::{run_alchemist, TestEnv};

const ANSWERS: &str = "In my last role the situation was a slow release. My task was to fix it, so I implemented a pipeline and we reduced deploy time by 80%.\n\
I worked together with the team and helped a colleague who was struggling.\n";

fn assert_success(output: &std::process::Output, what: &str) {
    assert!(
        output.status.success(),
        "{} should succeed\nstdout:\n{}\nstderr:\n{}",
        what,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

#[test]
fn alchemist_help_shows_usage() {
    let output = run_alchemist(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_success(&output, "--help");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("practice"));
    assert!(
        !stderr.contains("No config file found"),
        "--help should not log config fallback noise\nstderr:\n{}",
        stderr
    );
}

#[test]
fn alchemist_version_shows_version() {
    let output = run_alchemist(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_success(&output, "--version");
    assert!(stdout.contains("alchemist "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_alchemist(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_success(&output, "completions bash");
    assert!(
        stdout.contains("alchemist"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn config_show_works() {
    let output = run_alchemist(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_success(&output, "config show");
    assert!(stdout.contains("[general]"));
    assert!(stdout.contains("[interview]"));
    assert!(stdout.contains("provider = \"stub\""));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let env = TestEnv::new();

    assert_success(&env.run(&["config", "init"]), "config init");
    assert!(env.config_path().exists());

    let second = env.run(&["config", "init"]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    assert_success(&env.run(&["config", "init", "--force"]), "config init --force");
}

#[test]
fn history_is_empty_on_first_run() {
    let output = run_alchemist(&["history"]);
    assert_success(&output, "history");
    assert!(String::from_utf8_lossy(&output.stdout).contains("No interviews found"));
}

#[test]
fn practice_records_history_across_runs() {
    let env = TestEnv::new();

    let output = env.run_with_stdin(
        &[
            "practice",
            "--role",
            "Backend Engineer",
            "--company",
            "Acme",
            "-n",
            "2",
            "--no-voice",
        ],
        ANSWERS,
    );
    assert_success(&output, "practice");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Q1:"));
    assert!(stdout.contains("Q2:"));
    assert!(stdout.contains("Interview complete"));
    assert!(stdout.contains("answered 2 of 2"));

    let history = env.run(&["history"]);
    assert_success(&history, "history");
    let listing = String::from_utf8_lossy(&history.stdout);
    assert!(listing.contains("Backend Engineer"));
    assert!(listing.contains("Acme"));

    let progress = env.run(&["progress", "--json"]);
    assert_success(&progress, "progress --json");
    let stats: serde_json::Value =
        serde_json::from_slice(&progress.stdout).expect("progress output is JSON");
    assert_eq!(stats["total_interviews"], 1);
    assert_eq!(stats["total_questions_answered"], 2);
    assert_eq!(stats["progress"]["trend"], "neutral");
}

#[test]
fn export_json_contains_transcript() {
    let env = TestEnv::new();
    assert_success(
        &env.run_with_stdin(
            &["practice", "-r", "SRE", "-c", "Initech", "-n", "1", "--no-voice"],
            ANSWERS,
        ),
        "practice",
    );

    let progress = env.run(&["progress", "--json"]);
    let stats: serde_json::Value = serde_json::from_slice(&progress.stdout).unwrap();
    let id = stats["recent_scores"][0]["session_id"]
        .as_str()
        .expect("session id")
        .to_string();

    let export = env.run(&["export", &id[..8], "--format", "json"]);
    assert_success(&export, "export --format json");
    let session: serde_json::Value = serde_json::from_slice(&export.stdout).unwrap();
    assert_eq!(session["id"], id.as_str());
    assert_eq!(session["status"], "completed");
    assert_eq!(session["messages"].as_array().map(Vec::len), Some(2));

    let show = env.run(&["show", &id[..8]]);
    assert_success(&show, "show");
    assert!(String::from_utf8_lossy(&show.stdout).contains("Candidate:"));
}

#[test]
fn show_unknown_interview_fails() {
    let output = run_alchemist(&["show", "deadbeef"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Interview not found"));
}

#[test]
fn profile_reports_completion() {
    let env = TestEnv::new();
    let path = env.home().join("profile.json");
    std::fs::write(
        &path,
        r#"{"name": "Ada", "email": "ada@example.com", "title": "Engineer", "skills": ["Rust"]}"#,
    )
    .unwrap();

    let output = env.run(&["profile", path.to_str().unwrap()]);
    assert_success(&output, "profile");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Profile completion: 70%"));
    assert!(stdout.contains("Missing: location, specializations, resume"));
}

#[test]
fn chat_with_reference_backend_reports_not_implemented() {
    let output = run_alchemist(&["chat", "hello"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Backend not implemented"));
}

#[test]
fn chat_with_memory_backend_echoes() {
    let env = TestEnv::new();
    env.write_config("[backend]\nprovider = \"memory\"\n");

    let output = env.run(&["chat", "How should I prepare?"]);
    assert_success(&output, "chat");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Echo: How should I prepare?"));
}

const RESUME: &str = "Ada Lovelace\n\
ada@example.com | (555) 123-4567 | linkedin.com/in/ada\n\
\n\
Summary\n\
Backend engineer focused on Rust services.\n\
\n\
Experience\n\
Senior Engineer, Acme 2019 - Present\n\
- Led migration of billing to Rust, reduced latency by 40%\n\
- Built Docker based CI pipeline\n\
\n\
Education\n\
BSc Computer Science, 2015\n\
\n\
Skills\n\
Rust, SQL, Docker\n";

#[test]
fn resume_is_scored_without_a_backend() {
    let env = TestEnv::new();
    let path = env.home().join("resume.txt");
    std::fs::write(&path, RESUME).unwrap();

    let output = env.run(&["resume", path.to_str().unwrap(), "-k", "rust,kafka"]);
    assert_success(&output, "resume");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ATS score:"));
    assert!(stdout.contains("Missing keywords: kafka"));
    assert!(stdout.contains("AI review unavailable"));
}

#[test]
fn resume_json_has_score_breakdown() {
    let env = TestEnv::new();
    let path = env.home().join("resume.txt");
    std::fs::write(&path, RESUME).unwrap();

    let output = env.run(&["resume", path.to_str().unwrap(), "--json"]);
    assert_success(&output, "resume --json");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["overall_score"].is_number());
    assert!(value["sections"].is_object());
}

#[test]
fn empty_resume_is_rejected() {
    let env = TestEnv::new();
    let path = env.home().join("resume.txt");
    std::fs::write(&path, "  \n").unwrap();

    let output = env.run(&["resume", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Resume is empty"));
}

#[test]
fn match_ranks_postings_by_skill_coverage() {
    let env = TestEnv::new();
    let profile = env.home().join("profile.json");
    let jobs = env.home().join("jobs.json");
    std::fs::write(&profile, r#"{"name": "Ada", "skills": ["Rust", "SQL"]}"#).unwrap();
    std::fs::write(
        &jobs,
        r#"[
            {"id": "j1", "title": "Platform Engineer", "company": "Initech", "skills_required": ["Rust", "Go"]},
            {"id": "j2", "title": "Backend Engineer", "company": "Acme", "skills_required": ["rust", "sql"]},
            {"id": "j3", "title": "Old Role", "company": "Globex", "skills_required": ["Rust"], "is_active": false}
        ]"#,
    )
    .unwrap();

    let output = env.run(&["match", profile.to_str().unwrap(), jobs.to_str().unwrap()]);
    assert_success(&output, "match");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let acme = stdout.find("Backend Engineer at Acme").expect("full match listed");
    let initech = stdout.find("Platform Engineer at Initech").expect("partial match listed");
    assert!(acme < initech);
    assert!(stdout.contains("100.0%"));
    assert!(stdout.contains("missing: Go"));
    assert!(!stdout.contains("Globex"));
}
