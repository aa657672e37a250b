use anyhow::Result;
use tempfile::tempdir;

use alchemist::interview::{
    Difficulty, InterviewStore, NewMessage, Outcome, ScoresPatch, StoreOptions,
    INTERVIEW_STORAGE_KEY,
};
use alchemist::storage::{Database, KeyValueStore, MemoryStorage};

fn complete_session(store: &mut InterviewStore, overall: f64, response_times: &[f64]) {
    let id = store
        .create_session("Backend Engineer", "Acme", Difficulty::Medium, false)
        .id
        .clone();
    assert_eq!(store.start_session(&id), Outcome::Applied);

    for (i, seconds) in response_times.iter().enumerate() {
        store.add_message(NewMessage::interviewer(format!("Question {}", i + 1)));
        store.add_message(NewMessage::candidate(format!("Answer {}", i + 1)).with_response_time(*seconds));
    }

    store.update_scores(ScoresPatch {
        overall: Some(overall),
        technical: Some(overall / 2.0),
        ..ScoresPatch::default()
    });
    assert_eq!(store.end_session(), Outcome::Applied);
}

#[test]
fn history_round_trips_through_sqlite() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("alchemist.db");

    let saved = {
        let mut store = InterviewStore::open(
            Box::new(Database::open_path(&db_path)?),
            StoreOptions::default(),
        );
        complete_session(&mut store, 61.3, &[4.5, 9.25]);
        complete_session(&mut store, 77.7, &[]);
        store.history().clone()
    };

    let reopened = InterviewStore::open(
        Box::new(Database::open_path(&db_path)?),
        StoreOptions::default(),
    );

    assert_eq!(reopened.history(), &saved);
    assert_eq!(reopened.history().total_interviews, 2);
    assert!(reopened.current_session().is_none());

    Ok(())
}

#[test]
fn only_history_is_persisted() -> Result<()> {
    let storage = MemoryStorage::new();
    let mut store = InterviewStore::open(Box::new(storage.clone()), StoreOptions::default());

    complete_session(&mut store, 50.0, &[3.0]);
    store.create_session("SRE", "Initech", Difficulty::Hard, true);

    let raw = storage
        .get(INTERVIEW_STORAGE_KEY)?
        .expect("history is written on completion");
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(value["version"], 0);
    assert!(value["state"]["history"]["sessions"].is_array());
    assert!(value["state"].get("current_session").is_none());

    let reopened = InterviewStore::open(Box::new(storage), StoreOptions::default());
    assert!(reopened.current_session().is_none());
    assert_eq!(reopened.history().sessions.len(), 1);

    Ok(())
}

#[test]
fn corrupt_history_starts_empty() {
    let storage = MemoryStorage::new();
    storage
        .set(INTERVIEW_STORAGE_KEY, "{\"state\": 42")
        .expect("write raw value");

    let store = InterviewStore::open(Box::new(storage), StoreOptions::default());
    assert!(store.history().sessions.is_empty());
    assert_eq!(store.history().total_interviews, 0);
}

#[test]
fn average_matches_stored_sessions_after_every_completion() {
    let mut store = InterviewStore::open(Box::new(MemoryStorage::new()), StoreOptions::default());

    for overall in [12.5, 88.0, 40.25, 73.0] {
        complete_session(&mut store, overall, &[1.0]);

        let history = store.history();
        let mean = history.sessions.iter().map(|s| s.scores.overall).sum::<f64>()
            / history.sessions.len() as f64;
        assert_eq!(history.average_score, mean);
    }
}

#[test]
fn unusable_score_does_not_cost_earlier_sessions() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("alchemist.db");

    {
        let mut store = InterviewStore::open(
            Box::new(Database::open_path(&db_path)?),
            StoreOptions::default(),
        );
        complete_session(&mut store, 70.0, &[2.0]);
        complete_session(&mut store, 80.0, &[2.0]);
        complete_session(&mut store, f64::NAN, &[f64::INFINITY]);

        assert!(store.history().average_score.is_finite());
    }

    let reopened = InterviewStore::open(
        Box::new(Database::open_path(&db_path)?),
        StoreOptions::default(),
    );
    let history = reopened.history();
    assert_eq!(history.sessions.len(), 3);
    assert_eq!(history.sessions[0].scores.overall, 0.0);
    assert_eq!(history.average_score, 50.0);

    Ok(())
}
