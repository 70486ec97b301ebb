//! Round lifecycle state machine
//!
//! `Setup -> Playing -> {Won, Lost} -> Setup`. Every operation either applies
//! completely or leaves the state untouched, and reports what happened as a
//! single classified [`Feedback`].

use super::clock::{Clock, SystemClock};
use super::feedback::Feedback;
use super::round::{RoundState, SmartHint};
use crate::core::math::compute_score;
use crate::core::{ClueKind, GameConfig, clue_text};
use crate::leaderboard::LeaderboardEntry;
use derive_more::{Display, Error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, info};

/// Lifecycle phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Playing,
    Won,
    Lost,
}

impl Phase {
    /// Whether the round has ended
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "SETUP",
            Self::Playing => "PLAYING",
            Self::Won => "WON",
            Self::Lost => "LOST",
        })
    }
}

/// Operation called in a phase that does not allow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    #[display("Operation requires phase {expected}, engine is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[display("Secret {secret} is outside the configured range")]
    SecretOutOfRange { secret: i64 },
}

/// Result of an accepted or rejected guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub feedback: Feedback,
    /// Present only when this guess won the round
    pub entry: Option<LeaderboardEntry>,
}

/// The game engine
///
/// Generic over the random source used to draw secrets and the clock used to
/// time rounds.
pub struct Engine<R: Rng = StdRng, C: Clock = SystemClock> {
    rng: R,
    clock: C,
    phase: Phase,
    config: Option<GameConfig>,
    round: Option<RoundState>,
    round_id: u64,
    feedback: Feedback,
}

impl Engine {
    /// Engine seeded from the OS with the system clock
    #[must_use]
    pub fn with_system() -> Self {
        Self::new(StdRng::from_os_rng(), SystemClock)
    }
}

impl<R: Rng, C: Clock> Engine<R, C> {
    #[must_use]
    pub fn new(rng: R, clock: C) -> Self {
        Self {
            rng,
            clock,
            phase: Phase::Setup,
            config: None,
            round: None,
            round_id: 0,
            feedback: Feedback::neutral("Choose your settings"),
        }
    }

    /// Start a round with a secret drawn uniformly from `[min, max]`
    ///
    /// # Errors
    /// Returns [`EngineError::WrongPhase`] unless the engine is in setup.
    pub fn start_round(&mut self, config: GameConfig) -> Result<Feedback, EngineError> {
        self.require(Phase::Setup)?;
        let secret = self.rng.random_range(config.min()..=config.max());
        self.begin(config, secret)
    }

    /// Start a round with a predetermined secret, for replays and tests
    ///
    /// # Errors
    /// Returns [`EngineError::WrongPhase`] unless the engine is in setup, or
    /// [`EngineError::SecretOutOfRange`] if `secret` is outside the range.
    pub fn start_round_with_secret(
        &mut self,
        config: GameConfig,
        secret: i64,
    ) -> Result<Feedback, EngineError> {
        self.require(Phase::Setup)?;
        if !config.contains(secret) {
            return Err(EngineError::SecretOutOfRange { secret });
        }
        self.begin(config, secret)
    }

    fn begin(&mut self, config: GameConfig, secret: i64) -> Result<Feedback, EngineError> {
        self.round_id += 1;
        info!(
            round = self.round_id,
            player = config.player_name(),
            difficulty = %config.difficulty(),
            min = config.min(),
            max = config.max(),
            "Round started"
        );

        self.round = Some(RoundState::new(&config, secret, self.clock.now()));
        self.config = Some(config);
        self.phase = Phase::Playing;
        Ok(self.emit(Feedback::neutral("Start Guessing!")))
    }

    /// Submit a guess
    ///
    /// Out-of-range and repeated guesses are rejected with bad feedback and do
    /// not change any state. An exact match wins even on the last try; a miss
    /// that uses up the last try loses with the running score unchanged.
    ///
    /// # Errors
    /// Returns [`EngineError::WrongPhase`] unless a round is being played.
    pub fn submit_guess(&mut self, value: i64) -> Result<GuessOutcome, EngineError> {
        self.require(Phase::Playing)?;
        let phase = self.phase;
        let (Some(config), Some(round)) = (self.config.as_ref(), self.round.as_mut()) else {
            return Err(EngineError::WrongPhase {
                expected: Phase::Playing,
                actual: phase,
            });
        };

        if !config.contains(value) {
            let feedback = Feedback::bad(format!("Range: {} - {}", config.min(), config.max()));
            return Ok(self.reject(feedback));
        }
        if round.has_guessed(value) {
            return Ok(self.reject(Feedback::bad("Already guessed that!")));
        }

        round.record_guess(value);
        let taken = round.guesses().len();
        debug!(round = self.round_id, guess = value, taken, "Guess recorded");

        if value == round.secret() {
            let now = self.clock.now();
            let elapsed = (now - round.started_at()).num_milliseconds() as f64 / 1000.0;
            let score = compute_score(taken, config.range_size(), 0, elapsed);
            round.set_final_score(score);

            let entry = LeaderboardEntry::new(
                config.player_name(),
                score,
                config.difficulty(),
                taken,
                now,
            );
            info!(round = self.round_id, score, guesses = taken, "Round won");
            self.phase = Phase::Won;
            return Ok(GuessOutcome {
                feedback: self.emit(Feedback::good("Correct!")),
                entry: Some(entry),
            });
        }

        if taken >= config.max_guesses() {
            let secret = round.secret();
            info!(round = self.round_id, secret, "Round lost");
            self.phase = Phase::Lost;
            return Ok(GuessOutcome {
                feedback: self.emit(Feedback::bad(format!("Game Over! It was {secret}"))),
                entry: None,
            });
        }

        round.narrow(value);
        let text = if value < round.secret() {
            "Too Low"
        } else {
            "Too High"
        };
        Ok(GuessOutcome {
            feedback: self.emit(Feedback::info(text)),
            entry: None,
        })
    }

    /// Buy a clue with points from the running score
    ///
    /// Rejected without state change if the clue is already unlocked or the
    /// running score cannot cover its cost.
    ///
    /// # Errors
    /// Returns [`EngineError::WrongPhase`] unless a round is being played.
    pub fn purchase_clue(&mut self, kind: ClueKind) -> Result<Feedback, EngineError> {
        self.require(Phase::Playing)?;
        let phase = self.phase;
        let Some(round) = self.round.as_mut() else {
            return Err(EngineError::WrongPhase {
                expected: Phase::Playing,
                actual: phase,
            });
        };

        if round.is_unlocked(kind) {
            return Ok(self.emit(Feedback::bad("Clue already unlocked!")));
        }
        if round.score() < kind.cost() {
            return Ok(self.emit(Feedback::bad("Need more points!")));
        }

        round.unlock(kind);
        let text = clue_text(kind, round.secret());
        debug!(round = self.round_id, clue = %kind, score = round.score(), "Clue unlocked");
        Ok(self.emit(Feedback::info(text)))
    }

    /// Drop the current round and return to setup
    pub fn reset_to_setup(&mut self) -> Feedback {
        if self.round.take().is_some() {
            debug!(round = self.round_id, "Round discarded");
        }
        self.config = None;
        self.phase = Phase::Setup;
        self.emit(Feedback::neutral("Choose your settings"))
    }

    /// Text of an unlocked clue; `None` while the clue is still locked
    #[must_use]
    pub fn clue_text(&self, kind: ClueKind) -> Option<String> {
        self.round
            .as_ref()
            .filter(|round| round.is_unlocked(kind))
            .map(|round| clue_text(kind, round.secret()))
    }

    /// Strategy readout, available while playing with smart mode on
    #[must_use]
    pub fn smart_hint(&self) -> Option<SmartHint> {
        if self.phase != Phase::Playing {
            return None;
        }
        match (&self.config, &self.round) {
            (Some(config), Some(round)) if config.smart_mode() => Some(round.smart_hint()),
            _ => None,
        }
    }

    /// Guesses left before the round is lost
    #[must_use]
    pub fn tries_remaining(&self) -> usize {
        match (&self.config, &self.round) {
            (Some(config), Some(round)) => {
                config.max_guesses().saturating_sub(round.guesses().len())
            }
            _ => 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Identifier of the most recently started round
    ///
    /// Background results tagged with an older id belong to a discarded round.
    #[inline]
    #[must_use]
    pub const fn round_id(&self) -> u64 {
        self.round_id
    }

    /// Most recent feedback message
    #[inline]
    #[must_use]
    pub const fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    fn require(&self, expected: Phase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn reject(&mut self, feedback: Feedback) -> GuessOutcome {
        GuessOutcome {
            feedback: self.emit(feedback),
            entry: None,
        }
    }

    fn emit(&mut self, feedback: Feedback) -> Feedback {
        self.feedback = feedback.clone();
        feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;
    use crate::engine::{FeedbackKind, ManualClock};
    use chrono::TimeDelta;

    fn engine() -> (Engine<StdRng, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (Engine::new(StdRng::seed_from_u64(7), clock.clone()), clock)
    }

    fn config(min: i64, max: i64, max_guesses: usize) -> GameConfig {
        GameConfig::new(min, max, Difficulty::Easy, max_guesses, false, "tess").unwrap()
    }

    #[test]
    fn fresh_round_invariants_hold_for_many_seeds() {
        for seed in 0..200 {
            let mut engine = Engine::new(StdRng::seed_from_u64(seed), ManualClock::default());
            let feedback = engine.start_round(config(1, 50, 10)).unwrap();
            assert_eq!(feedback.kind(), FeedbackKind::Neutral);

            let round = engine.round().unwrap();
            assert_eq!(engine.phase(), Phase::Playing);
            assert_eq!(round.range_low(), 1);
            assert_eq!(round.range_high(), 50);
            assert!((1..=50).contains(&round.secret()));
            assert_eq!(round.score(), 1000);
            assert!(round.guesses().is_empty());
            assert_eq!(engine.tries_remaining(), 10);
        }
    }

    #[test]
    fn scenario_low_high_correct() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 7).unwrap();

        let texts: Vec<String> = [3, 8, 7]
            .into_iter()
            .map(|g| engine.submit_guess(g).unwrap().feedback.text().to_string())
            .collect();

        assert_eq!(texts, vec!["Too Low", "Too High", "Correct!"]);
        assert_eq!(engine.phase(), Phase::Won);
        assert_eq!(engine.round().unwrap().guesses(), &[3, 8, 7]);
    }

    #[test]
    fn scenario_single_try_loss_reveals_secret() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 1), 5).unwrap();

        let outcome = engine.submit_guess(2).unwrap();

        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(outcome.feedback.text(), "Game Over! It was 5");
        assert_eq!(outcome.feedback.kind(), FeedbackKind::Bad);
        assert!(outcome.entry.is_none());
        assert_eq!(engine.round().unwrap().secret(), 5);
    }

    #[test]
    fn exact_guess_wins_on_last_try() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 2), 9).unwrap();

        engine.submit_guess(1).unwrap();
        let outcome = engine.submit_guess(9).unwrap();

        assert_eq!(engine.phase(), Phase::Won);
        assert_eq!(outcome.feedback.kind(), FeedbackKind::Good);
        let entry = outcome.entry.unwrap();
        assert_eq!(entry.guesses(), 2);
        assert_eq!(entry.name(), "tess");
        assert_eq!(entry.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn rejected_guesses_leave_state_untouched() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 4).unwrap();
        engine.submit_guess(6).unwrap();

        let before = engine.round().unwrap().clone();

        let out_of_range = engine.submit_guess(11).unwrap();
        assert_eq!(out_of_range.feedback.text(), "Range: 1 - 10");
        assert_eq!(out_of_range.feedback.kind(), FeedbackKind::Bad);

        let duplicate = engine.submit_guess(6).unwrap();
        assert_eq!(duplicate.feedback.text(), "Already guessed that!");

        let after = engine.round().unwrap();
        assert_eq!(after.guesses(), before.guesses());
        assert_eq!(after.range_high(), before.range_high());
        assert_eq!(engine.tries_remaining(), 2);
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn bounds_narrow_monotonically_and_contain_secret() {
        for seed in 0..50 {
            let mut engine = Engine::new(StdRng::seed_from_u64(seed), ManualClock::default());
            engine.start_round(config(1, 50, 50)).unwrap();
            let secret = engine.round().unwrap().secret();

            let misses: Vec<i64> = (1..=50).rev().filter(|&g| g != secret).collect();
            for guess in misses.into_iter().step_by(3) {
                let (low, high) = {
                    let round = engine.round().unwrap();
                    (round.range_low(), round.range_high())
                };
                engine.submit_guess(guess).unwrap();
                let round = engine.round().unwrap();
                assert!(round.range_low() >= low);
                assert!(round.range_high() <= high);
                assert!(round.range_low() <= secret && secret <= round.range_high());
            }
        }
    }

    #[test]
    fn win_score_ignores_clue_spending_and_counts_time() {
        let (mut engine, clock) = engine();
        engine.start_round_with_secret(config(1, 10, 10), 3).unwrap();

        engine.purchase_clue(ClueKind::DigitSum).unwrap();
        assert_eq!(engine.round().unwrap().score(), 850);

        for guess in [10, 9, 8, 7, 6] {
            engine.submit_guess(guess).unwrap();
        }
        clock.advance(TimeDelta::milliseconds(4_600));
        let outcome = engine.submit_guess(3).unwrap();

        // 6 guesses vs an optimum of 4, 4.6s elapsed
        let expected = 1000 - 200 - 9;
        assert_eq!(engine.round().unwrap().score(), expected);
        assert_eq!(outcome.entry.unwrap().score(), expected);
    }

    #[test]
    fn loss_keeps_running_score() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 2), 3).unwrap();
        engine.purchase_clue(ClueKind::Parity).unwrap();
        engine.submit_guess(5).unwrap();
        engine.submit_guess(1).unwrap();

        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(engine.round().unwrap().score(), 950);
    }

    #[test]
    fn clue_purchase_twice_is_rejected() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 6).unwrap();

        let first = engine.purchase_clue(ClueKind::Parity).unwrap();
        assert_eq!(first.kind(), FeedbackKind::Info);
        assert_eq!(first.text(), "The number is Even.");

        let second = engine.purchase_clue(ClueKind::Parity).unwrap();
        assert_eq!(second.text(), "Clue already unlocked!");
        assert_eq!(engine.round().unwrap().score(), 950);
        assert_eq!(engine.round().unwrap().unlocked_clues(), vec![ClueKind::Parity]);
    }

    #[test]
    fn clue_needs_enough_points() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 50, 10), 30).unwrap();

        for kind in ClueKind::ALL {
            engine.purchase_clue(kind).unwrap();
        }
        // 1000 - 375 spent; everything bought
        assert_eq!(engine.round().unwrap().score(), 625);
        assert_eq!(
            engine.clue_text(ClueKind::DigitSum).as_deref(),
            Some("The sum of the digits is 3.")
        );
    }

    #[test]
    fn insufficient_score_rejected_without_change() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 6).unwrap();
        engine
            .round
            .as_mut()
            .unwrap()
            .set_final_score(120);

        let feedback = engine.purchase_clue(ClueKind::DigitSum).unwrap();
        assert_eq!(feedback.text(), "Need more points!");
        assert_eq!(engine.round().unwrap().score(), 120);
        assert!(engine.clue_text(ClueKind::DigitSum).is_none());
    }

    #[test]
    fn operations_require_playing_phase() {
        let (mut engine, _) = engine();
        assert_eq!(
            engine.submit_guess(3),
            Err(EngineError::WrongPhase {
                expected: Phase::Playing,
                actual: Phase::Setup
            })
        );
        assert!(engine.purchase_clue(ClueKind::Prime).is_err());

        engine.start_round_with_secret(config(1, 10, 3), 2).unwrap();
        engine.submit_guess(2).unwrap();
        assert!(engine.submit_guess(4).is_err());
        assert!(engine.start_round(config(1, 10, 3)).is_err());
    }

    #[test]
    fn forced_secret_must_be_in_range() {
        let (mut engine, _) = engine();
        assert_eq!(
            engine.start_round_with_secret(config(1, 10, 3), 11),
            Err(EngineError::SecretOutOfRange { secret: 11 })
        );
        assert_eq!(engine.phase(), Phase::Setup);
    }

    #[test]
    fn reset_starts_fresh_round() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 2).unwrap();
        engine.submit_guess(2).unwrap();
        let first_id = engine.round_id();

        engine.reset_to_setup();
        assert_eq!(engine.phase(), Phase::Setup);
        assert!(engine.round().is_none());
        assert!(engine.config().is_none());

        engine.start_round(config(1, 10, 3)).unwrap();
        assert_eq!(engine.round_id(), first_id + 1);
        assert!(engine.round().unwrap().guesses().is_empty());
    }

    #[test]
    fn extreme_preset_bounds_do_not_overflow() {
        let (mut engine, _) = engine();
        let wide = GameConfig::new(
            5_000_000_000_000_000_000,
            9_000_000_000_000_000_000,
            Difficulty::Hard,
            3,
            true,
            "max",
        )
        .unwrap();
        engine.start_round(wide).unwrap();
        assert_eq!(
            engine.smart_hint().unwrap().optimal_guess,
            7_000_000_000_000_000_000
        );
        engine.reset_to_setup();

        let full = GameConfig::new(i64::MIN, i64::MAX, Difficulty::Hard, 3, false, "max").unwrap();
        engine.start_round_with_secret(full, i64::MAX - 24).unwrap();
        engine.purchase_clue(ClueKind::DigitSum).unwrap();
        let outcome = engine.submit_guess(i64::MAX - 24).unwrap();
        assert_eq!(engine.phase(), Phase::Won);
        assert_eq!(outcome.entry.unwrap().score(), 1000);
    }

    #[test]
    fn smart_hint_only_in_smart_mode_while_playing() {
        let (mut engine, _) = engine();
        engine.start_round_with_secret(config(1, 10, 3), 2).unwrap();
        assert!(engine.smart_hint().is_none());
        engine.reset_to_setup();

        let smart = GameConfig::new(1, 10, Difficulty::Easy, 3, true, "tess").unwrap();
        engine.start_round_with_secret(smart, 2).unwrap();
        assert_eq!(engine.smart_hint().unwrap().optimal_guess, 5);

        engine.submit_guess(5).unwrap();
        assert_eq!(engine.smart_hint().unwrap().optimal_guess, 2);

        engine.submit_guess(2).unwrap();
        assert!(engine.smart_hint().is_none());
    }
}
