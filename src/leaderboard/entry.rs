//! A single leaderboard record

use crate::core::Difficulty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one won round
///
/// Serialized as `{"name", "score", "difficulty", "guesses", "date"}` with the
/// date in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    name: String,
    score: u32,
    difficulty: Difficulty,
    guesses: usize,
    #[serde(rename = "date", with = "chrono::serde::ts_milliseconds")]
    completed_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        score: u32,
        difficulty: Difficulty,
        guesses: usize,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            score,
            difficulty,
            guesses,
            completed_at,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    #[must_use]
    pub const fn guesses(&self) -> usize {
        self.guesses
    }

    #[inline]
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_in_storage_layout() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let entry = LeaderboardEntry::new("ada", 930, Difficulty::Hard, 5, at);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "ada",
                "score": 930,
                "difficulty": "HARD",
                "guesses": 5,
                "date": 1_700_000_000_123_i64,
            })
        );
    }

    #[test]
    fn reads_stored_record() {
        let text = r#"{"name":"bo","score":1000,"difficulty":"EASY","guesses":2,"date":1700000000000}"#;
        let entry: LeaderboardEntry = serde_json::from_str(text).unwrap();
        assert_eq!(entry.name(), "bo");
        assert_eq!(entry.difficulty(), Difficulty::Easy);
        assert_eq!(entry.completed_at().timestamp_millis(), 1_700_000_000_000);
    }
}
