//! Progress analytics over the interview history

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::interview::models::{Difficulty, InterviewHistory, InterviewSession};
use crate::interview::round1;

/// Percent change above which progress counts as a real move
const TREND_THRESHOLD: f64 = 5.0;
const RECENT_WINDOW: usize = 3;
const RECENT_SCORES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTrend {
    Improving,
    Declining,
    Stable,
    Neutral,
}

impl ProgressTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Percent change of the recent window against the older one
    pub improvement: f64,
    pub trend: ProgressTrend,
}

impl Progress {
    fn neutral() -> Self {
        Self {
            improvement: 0.0,
            trend: ProgressTrend::Neutral,
        }
    }
}

/// Compare the three newest sessions against the three before them.
///
/// When fewer than three older sessions exist the recent mean is used as
/// the baseline, so short histories read as stable.
pub fn calculate_progress(history: &InterviewHistory) -> Progress {
    let sessions = &history.sessions;
    if sessions.len() < 2 {
        return Progress::neutral();
    }

    let recent = &sessions[..sessions.len().min(RECENT_WINDOW)];
    let older = sessions
        .get(RECENT_WINDOW..sessions.len().min(RECENT_WINDOW * 2))
        .unwrap_or(&[]);

    let recent_avg = mean_overall(recent);
    let older_avg = if older.len() < RECENT_WINDOW {
        recent_avg
    } else {
        mean_overall(older)
    };

    let improvement = if older_avg == 0.0 {
        0.0
    } else {
        (recent_avg - older_avg) / older_avg * 100.0
    };

    let trend = if improvement > TREND_THRESHOLD {
        ProgressTrend::Improving
    } else if improvement < -TREND_THRESHOLD {
        ProgressTrend::Declining
    } else {
        ProgressTrend::Stable
    };

    Progress { improvement, trend }
}

fn mean_overall(sessions: &[InterviewSession]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    sessions.iter().map(|s| s.scores.overall).sum::<f64>() / sessions.len() as f64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DifficultyStats {
    pub count: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePoint {
    pub session_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub score: f64,
}

/// Aggregate numbers for the progress report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewStats {
    pub total_interviews: u32,
    pub average_score: f64,
    pub best_score: f64,
    pub total_questions_answered: u32,
    pub total_practice_minutes: i64,
    pub by_difficulty: BTreeMap<Difficulty, DifficultyStats>,
    /// Newest first
    pub recent_scores: Vec<ScorePoint>,
    pub progress: Progress,
}

impl InterviewStats {
    pub fn from_history(history: &InterviewHistory) -> Self {
        let sessions = &history.sessions;

        let mut totals: BTreeMap<Difficulty, (usize, f64)> = BTreeMap::new();
        for session in sessions {
            let entry = totals.entry(session.difficulty).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += session.scores.overall;
        }

        let by_difficulty = totals
            .into_iter()
            .map(|(difficulty, (count, sum))| {
                (
                    difficulty,
                    DifficultyStats {
                        count,
                        average_score: round1(sum / count as f64),
                    },
                )
            })
            .collect();

        Self {
            total_interviews: history.total_interviews,
            average_score: round1(mean_overall(sessions)),
            best_score: sessions
                .iter()
                .map(|s| s.scores.overall)
                .fold(0.0, f64::max),
            total_questions_answered: sessions.iter().map(|s| s.metrics.questions_answered).sum(),
            total_practice_minutes: sessions.iter().filter_map(|s| s.duration_minutes()).sum(),
            by_difficulty,
            recent_scores: sessions
                .iter()
                .take(RECENT_SCORES)
                .map(|s| ScorePoint {
                    session_id: s.id.clone(),
                    completed_at: s.end_time,
                    score: s.scores.overall,
                })
                .collect(),
            progress: calculate_progress(history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{SessionSettings, SessionStatus};
    use chrono::Duration;

    fn session(overall: f64, difficulty: Difficulty) -> InterviewSession {
        let start = Utc::now();
        let mut session = InterviewSession {
            id: uuid::Uuid::new_v4().to_string(),
            role: "Engineer".to_string(),
            company: "Acme".to_string(),
            difficulty,
            start_time: start,
            end_time: Some(start + Duration::minutes(20)),
            status: SessionStatus::Completed,
            messages: Vec::new(),
            questions_asked: Vec::new(),
            scores: Default::default(),
            feedback: Default::default(),
            metrics: Default::default(),
            settings: SessionSettings {
                voice_enabled: false,
                auto_play: true,
                difficulty,
                duration_minutes: 30,
            },
        };
        session.scores.overall = overall;
        session.metrics.questions_answered = 2;
        session
    }

    fn history(scores: &[f64]) -> InterviewHistory {
        let mut history = InterviewHistory {
            sessions: scores
                .iter()
                .map(|&s| session(s, Difficulty::Medium))
                .collect(),
            total_interviews: scores.len() as u32,
            ..InterviewHistory::default()
        };
        history.recompute_average();
        history
    }

    #[test]
    fn fewer_than_two_sessions_is_neutral() {
        assert_eq!(calculate_progress(&history(&[])).trend, ProgressTrend::Neutral);
        assert_eq!(
            calculate_progress(&history(&[90.0])).trend,
            ProgressTrend::Neutral
        );
    }

    #[test]
    fn short_history_reads_stable() {
        let progress = calculate_progress(&history(&[90.0, 40.0, 60.0, 20.0]));
        assert_eq!(progress.trend, ProgressTrend::Stable);
        assert_eq!(progress.improvement, 0.0);
    }

    #[test]
    fn improving_when_recent_beats_older_by_more_than_five_percent() {
        let progress = calculate_progress(&history(&[80.0, 80.0, 80.0, 60.0, 60.0, 60.0]));
        assert_eq!(progress.trend, ProgressTrend::Improving);
        assert!((progress.improvement - 33.333).abs() < 0.01);
    }

    #[test]
    fn declining_when_recent_trails_older() {
        let progress = calculate_progress(&history(&[50.0, 50.0, 50.0, 70.0, 70.0, 70.0, 10.0]));
        assert_eq!(progress.trend, ProgressTrend::Declining);
    }

    #[test]
    fn small_moves_are_stable() {
        let progress = calculate_progress(&history(&[62.0, 62.0, 62.0, 60.0, 60.0, 60.0]));
        assert_eq!(progress.trend, ProgressTrend::Stable);
    }

    #[test]
    fn zero_older_mean_is_not_a_division() {
        let progress = calculate_progress(&history(&[50.0, 50.0, 50.0, 0.0, 0.0, 0.0]));
        assert_eq!(progress.improvement, 0.0);
        assert_eq!(progress.trend, ProgressTrend::Stable);
    }

    #[test]
    fn stats_summarize_history() {
        let mut history = history(&[70.0, 85.0]);
        history.sessions.push(session(40.0, Difficulty::Hard));
        history.total_interviews = 3;

        let stats = InterviewStats::from_history(&history);
        assert_eq!(stats.total_interviews, 3);
        assert_eq!(stats.average_score, 65.0);
        assert_eq!(stats.best_score, 85.0);
        assert_eq!(stats.total_questions_answered, 6);
        assert_eq!(stats.total_practice_minutes, 60);
        assert_eq!(stats.by_difficulty[&Difficulty::Medium].count, 2);
        assert_eq!(stats.by_difficulty[&Difficulty::Medium].average_score, 77.5);
        assert_eq!(stats.by_difficulty[&Difficulty::Hard].count, 1);
        assert_eq!(stats.recent_scores.len(), 3);
        assert_eq!(stats.recent_scores[0].score, 70.0);
    }
}
