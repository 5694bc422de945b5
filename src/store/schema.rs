use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

pub const SCHEMA_VERSION: u32 = 1;

/// Finished sessions kept in `history.json`; the oldest are dropped first.
pub const HISTORY_LIMIT: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    #[serde(default)]
    pub learner: Option<String>,
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub total_study_secs: f64,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub last_practice_date: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            learner: None,
            high_score: 0,
            total_sessions: 0,
            total_study_secs: 0.0,
            correct_answers: 0,
            total_attempts: 0,
            streak_days: 0,
            best_streak: 0,
            last_practice_date: None,
        }
    }
}

impl ProfileData {
    pub fn for_learner(name: &str) -> Self {
        Self {
            learner: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn accuracy(&self) -> f64 {
        crate::engine::scoring::accuracy(self.correct_answers, self.total_attempts)
    }

    /// Fold one finished session into the totals. Returns true when it set a
    /// new high score.
    pub fn absorb(&mut self, result: &SessionResult, today: NaiveDate) -> bool {
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.total_study_secs += result.elapsed_secs.max(0.0);
        self.correct_answers = self.correct_answers.saturating_add(result.correct_count);
        self.total_attempts = self.total_attempts.saturating_add(result.total_tasks);
        self.register_practice(today);

        if result.score > self.high_score {
            self.high_score = result.score;
            true
        } else {
            false
        }
    }

    /// Daily streak: practicing on consecutive days extends it, a gap
    /// restarts it at one, and a second session on the same day changes
    /// nothing.
    pub fn register_practice(&mut self, today: NaiveDate) {
        let today_str = today.format("%Y-%m-%d").to_string();
        if self.last_practice_date.as_deref() == Some(today_str.as_str()) {
            return;
        }
        let yesterday = (today - Duration::days(1)).format("%Y-%m-%d").to_string();
        if self.last_practice_date.as_deref() == Some(yesterday.as_str()) {
            self.streak_days += 1;
        } else {
            self.streak_days = 1;
        }
        self.best_streak = self.best_streak.max(self.streak_days);
        self.last_practice_date = Some(today_str);
    }
}

/// Every learner's profile, keyed by name. Stored as `profiles.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileBook {
    pub schema_version: u32,
    #[serde(default)]
    pub learners: BTreeMap<String, ProfileData>,
}

impl Default for ProfileBook {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            learners: BTreeMap::new(),
        }
    }
}

impl ProfileBook {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// The stored profile for `learner`, or a fresh one carrying their name.
    pub fn profile(&self, learner: &str) -> ProfileData {
        self.learners
            .get(learner)
            .cloned()
            .unwrap_or_else(|| ProfileData::for_learner(learner))
    }

    pub fn profile_mut(&mut self, learner: &str) -> &mut ProfileData {
        self.learners
            .entry(learner.to_string())
            .or_insert_with(|| ProfileData::for_learner(learner))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionHistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionResult>,
}

impl Default for SessionHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl SessionHistoryData {
    pub fn push(&mut self, result: SessionResult) {
        self.sessions.push(result);
        if self.sessions.len() > HISTORY_LIMIT {
            let excess = self.sessions.len() - HISTORY_LIMIT;
            self.sessions.drain(..excess);
        }
    }

    pub fn for_learner<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SessionResult> {
        self.sessions
            .iter()
            .filter(move |r| r.learner.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::session::result::FinishReason;
    use crate::task::TaskKind;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn result(score: u32) -> SessionResult {
        SessionResult {
            score,
            correct_count: 2,
            total_tasks: 3,
            task_kind: TaskKind::Punctuation,
            elapsed_secs: 30.0,
            finish_reason: FinishReason::Completed,
            timestamp: Utc::now(),
            learner: None,
        }
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let mut profile = ProfileData::default();
        profile.register_practice(day("2024-11-11"));
        profile.register_practice(day("2024-11-12"));
        profile.register_practice(day("2024-11-12"));
        profile.register_practice(day("2024-11-13"));
        assert_eq!(profile.streak_days, 3);
        assert_eq!(profile.best_streak, 3);

        profile.register_practice(day("2024-11-20"));
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.best_streak, 3);
        assert_eq!(profile.last_practice_date.as_deref(), Some("2024-11-20"));
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let mut profile = ProfileData::default();
        profile.register_practice(day("2024-02-29"));
        profile.register_practice(day("2024-03-01"));
        assert_eq!(profile.streak_days, 2);
    }

    #[test]
    fn absorb_only_raises_high_score() {
        let mut profile = ProfileData::default();
        assert!(profile.absorb(&result(40), day("2024-11-13")));
        assert!(!profile.absorb(&result(20), day("2024-11-13")));
        assert!(!profile.absorb(&result(40), day("2024-11-13")));
        assert_eq!(profile.high_score, 40);
        assert_eq!(profile.total_sessions, 3);
        assert_eq!(profile.correct_answers, 6);
        assert_eq!(profile.total_attempts, 9);
        assert!((profile.total_study_secs - 90.0).abs() < 1e-9);
        assert!((profile.accuracy() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn history_is_capped() {
        let mut history = SessionHistoryData::default();
        for score in 0..(HISTORY_LIMIT as u32 + 5) {
            history.push(result(score));
        }
        assert_eq!(history.sessions.len(), HISTORY_LIMIT);
        assert_eq!(history.sessions[0].score, 5);
    }

    #[test]
    fn stale_schema_needs_reset() {
        let profile: ProfileData = serde_json::from_str(r#"{"schema_version": 0}"#).unwrap();
        assert!(profile.needs_reset());
        assert!(!ProfileData::default().needs_reset());
    }

    #[test]
    fn absorb_saturates_instead_of_overflowing() {
        let mut profile = ProfileData {
            correct_answers: u32::MAX - 1,
            total_attempts: u32::MAX,
            ..ProfileData::default()
        };
        profile.absorb(&result(u32::MAX), day("2024-11-13"));
        assert_eq!(profile.correct_answers, u32::MAX);
        assert_eq!(profile.total_attempts, u32::MAX);
        assert_eq!(profile.high_score, u32::MAX);
    }

    #[test]
    fn book_keeps_one_profile_per_learner() {
        let mut book = ProfileBook::default();
        book.profile_mut("Ona").absorb(&result(80), day("2024-11-12"));
        book.profile_mut("Jonas").absorb(&result(20), day("2024-11-12"));
        book.profile_mut("Ona").absorb(&result(40), day("2024-11-13"));

        let ona = book.profile("Ona");
        assert_eq!(ona.learner.as_deref(), Some("Ona"));
        assert_eq!(ona.high_score, 80);
        assert_eq!(ona.total_sessions, 2);
        assert_eq!(ona.streak_days, 2);
        assert_eq!(book.profile("Jonas").high_score, 20);

        let stranger = book.profile("Petras");
        assert_eq!(stranger.learner.as_deref(), Some("Petras"));
        assert_eq!(stranger.total_sessions, 0);
        assert_eq!(book.learners.len(), 2);
    }

    #[test]
    fn history_filters_by_learner() {
        let mut history = SessionHistoryData::default();
        for (name, score) in [("Ona", 10), ("Jonas", 20), ("Ona", 30)] {
            history.push(SessionResult {
                learner: Some(name.to_string()),
                ..result(score)
            });
        }
        let ona: Vec<u32> = history.for_learner("Ona").map(|r| r.score).collect();
        assert_eq!(ona, vec![10, 30]);
    }
}
