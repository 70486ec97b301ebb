//! Mutable state of a single round
//!
//! Only the engine mutates a [`RoundState`]; everyone else sees it through
//! shared references.

use crate::core::math::{BASE_SCORE, binary_search_pivot, range_size};
use crate::core::{ClueKind, GameConfig};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// How a logged guess compares to the secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessVerdict {
    TooLow,
    TooHigh,
    Match,
}

impl GuessVerdict {
    #[must_use]
    pub fn of(guess: i64, secret: i64) -> Self {
        match guess.cmp(&secret) {
            Ordering::Less => Self::TooLow,
            Ordering::Greater => Self::TooHigh,
            Ordering::Equal => Self::Match,
        }
    }

    /// Upper-case tag for history lists
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TooLow => "TOO LOW",
            Self::TooHigh => "TOO HIGH",
            Self::Match => "MATCH",
        }
    }
}

/// Strategy readout shown in smart mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmartHint {
    /// Chance, in percent, that a blind guess inside the bounds hits
    pub probability_percent: f64,
    /// Midpoint of the current bounds
    pub optimal_guess: i64,
}

/// State of the round in progress
#[derive(Debug, Clone)]
pub struct RoundState {
    secret: i64,
    guesses: Vec<i64>,
    range_low: i64,
    range_high: i64,
    score: u32,
    unlocked: FxHashSet<ClueKind>,
    started_at: DateTime<Utc>,
}

impl RoundState {
    pub(super) fn new(config: &GameConfig, secret: i64, started_at: DateTime<Utc>) -> Self {
        Self {
            secret,
            guesses: Vec::with_capacity(config.max_guesses()),
            range_low: config.min(),
            range_high: config.max(),
            score: BASE_SCORE,
            unlocked: FxHashSet::default(),
            started_at,
        }
    }

    #[inline]
    #[must_use]
    pub const fn secret(&self) -> i64 {
        self.secret
    }

    /// Guesses in submission order
    #[inline]
    #[must_use]
    pub fn guesses(&self) -> &[i64] {
        &self.guesses
    }

    #[inline]
    #[must_use]
    pub const fn range_low(&self) -> i64 {
        self.range_low
    }

    #[inline]
    #[must_use]
    pub const fn range_high(&self) -> i64 {
        self.range_high
    }

    #[inline]
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_unlocked(&self, kind: ClueKind) -> bool {
        self.unlocked.contains(&kind)
    }

    /// Unlocked clues in catalog order
    #[must_use]
    pub fn unlocked_clues(&self) -> Vec<ClueKind> {
        ClueKind::ALL
            .into_iter()
            .filter(|kind| self.unlocked.contains(kind))
            .collect()
    }

    #[must_use]
    pub fn has_guessed(&self, value: i64) -> bool {
        self.guesses.contains(&value)
    }

    #[must_use]
    pub fn last_guess(&self) -> Option<i64> {
        self.guesses.last().copied()
    }

    /// Integers still consistent with the feedback so far
    #[must_use]
    pub const fn remaining_range(&self) -> u64 {
        range_size(self.range_low, self.range_high)
    }

    /// Each logged guess paired with how it compared to the secret
    pub fn history(&self) -> impl DoubleEndedIterator<Item = (i64, GuessVerdict)> + '_ {
        self.guesses
            .iter()
            .map(|&guess| (guess, GuessVerdict::of(guess, self.secret)))
    }

    /// Blind-hit probability and the halving guess for the current bounds
    #[must_use]
    pub fn smart_hint(&self) -> SmartHint {
        let remaining = self.remaining_range().max(1);
        SmartHint {
            probability_percent: 100.0 / remaining as f64,
            optimal_guess: binary_search_pivot(self.range_low, self.range_high),
        }
    }

    pub(super) fn record_guess(&mut self, value: i64) {
        self.guesses.push(value);
    }

    /// Tighten the bounds after a miss
    pub(super) fn narrow(&mut self, value: i64) {
        if value < self.secret {
            self.range_low = self.range_low.max(value + 1);
        } else {
            self.range_high = self.range_high.min(value - 1);
        }
        debug_assert!(self.range_low <= self.secret && self.secret <= self.range_high);
    }

    pub(super) fn unlock(&mut self, kind: ClueKind) {
        self.score = self.score.saturating_sub(kind.cost());
        self.unlocked.insert(kind);
    }

    pub(super) fn set_final_score(&mut self, score: u32) {
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;

    fn round(secret: i64) -> RoundState {
        let config = GameConfig::new(1, 10, Difficulty::Easy, 3, true, "tess").unwrap();
        RoundState::new(&config, secret, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn verdict_compares_against_secret() {
        assert_eq!(GuessVerdict::of(3, 7), GuessVerdict::TooLow);
        assert_eq!(GuessVerdict::of(9, 7), GuessVerdict::TooHigh);
        assert_eq!(GuessVerdict::of(7, 7), GuessVerdict::Match);
    }

    #[test]
    fn narrow_never_widens() {
        let mut state = round(6);
        state.narrow(8);
        assert_eq!((state.range_low(), state.range_high()), (1, 7));

        // A guess outside the current bounds must not widen them
        state.narrow(9);
        assert_eq!((state.range_low(), state.range_high()), (1, 7));

        state.narrow(2);
        state.narrow(1);
        assert_eq!((state.range_low(), state.range_high()), (3, 7));
    }

    #[test]
    fn smart_hint_tracks_bounds() {
        let mut state = round(9);
        let hint = state.smart_hint();
        assert_eq!(hint.optimal_guess, 5);
        assert!((hint.probability_percent - 10.0).abs() < f64::EPSILON);

        state.narrow(5);
        let hint = state.smart_hint();
        assert_eq!(hint.optimal_guess, 8);
        assert!((hint.probability_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unlock_deducts_cost_once_listed() {
        let mut state = round(4);
        state.unlock(ClueKind::Prime);
        state.unlock(ClueKind::Parity);
        assert_eq!(state.score(), 850);
        assert_eq!(
            state.unlocked_clues(),
            vec![ClueKind::Parity, ClueKind::Prime]
        );
    }

    #[test]
    fn history_pairs_guesses_with_verdicts() {
        let mut state = round(5);
        state.record_guess(2);
        state.record_guess(8);
        let history: Vec<_> = state.history().collect();
        assert_eq!(
            history,
            vec![(2, GuessVerdict::TooLow), (8, GuessVerdict::TooHigh)]
        );
        assert_eq!(state.last_guess(), Some(8));
    }
}
