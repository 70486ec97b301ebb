//! Leaderboard query command

use crate::core::Difficulty;
use crate::leaderboard::{LeaderboardEntry, LeaderboardPersistence, LeaderboardStore};

/// Ranked entries per requested difficulty
pub struct LeaderboardReport<'a> {
    pub sections: Vec<(Difficulty, Vec<&'a LeaderboardEntry>)>,
}

/// Top `top` entries for one difficulty, or for each difficulty when `None`
#[must_use]
pub fn query_leaderboard<P: LeaderboardPersistence>(
    store: &LeaderboardStore<P>,
    difficulty: Option<Difficulty>,
    top: usize,
) -> LeaderboardReport<'_> {
    let difficulties = difficulty.map_or_else(|| Difficulty::ALL.to_vec(), |d| vec![d]);
    LeaderboardReport {
        sections: difficulties
            .into_iter()
            .map(|d| (d, store.top_n(d, top)))
            .collect(),
    }
}
