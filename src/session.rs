//! A player's sitting: engine, leaderboard and coaching wired together
//!
//! Front-ends drive a [`Session`] instead of the engine directly so that won
//! rounds always reach the leaderboard and background coaching stays tied to
//! the round it was asked for.

use crate::advisory::{AdvisoryDispatcher, AdvisoryUpdate, Analysis, StrategyReview};
use crate::core::{ClueKind, ConfigError, Difficulty, GameConfig, PresetTable};
use crate::engine::{Clock, Engine, EngineError, Feedback, GuessOutcome, Phase, SystemClock};
use crate::leaderboard::{LeaderboardEntry, LeaderboardPersistence, LeaderboardStore};
use derive_more::{Display, Error, From};
use rand::Rng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, warn};

/// Entries shown per difficulty
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    Config(ConfigError),
    Engine(EngineError),
}

/// State of the optional coach analysis for the current round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoachState {
    #[default]
    Idle,
    Pending,
    Ready(Analysis),
    Unavailable,
}

/// State of the fun fact requested after a win
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FunFactState {
    #[default]
    Idle,
    Pending,
    Ready(String),
    Unavailable,
}

pub struct Session<P: LeaderboardPersistence, R: Rng = StdRng, C: Clock = SystemClock> {
    engine: Engine<R, C>,
    leaderboard: LeaderboardStore<P>,
    presets: PresetTable,
    advisor: AdvisoryDispatcher,
    coach: CoachState,
    fun_fact: FunFactState,
}

impl<P: LeaderboardPersistence, R: Rng, C: Clock> Session<P, R, C> {
    #[must_use]
    pub fn new(
        engine: Engine<R, C>,
        leaderboard: LeaderboardStore<P>,
        presets: PresetTable,
        advisor: AdvisoryDispatcher,
    ) -> Self {
        Self {
            engine,
            leaderboard,
            presets,
            advisor,
            coach: CoachState::Idle,
            fun_fact: FunFactState::Idle,
        }
    }

    /// Start a round from the difficulty preset
    ///
    /// A finished or abandoned round is discarded first.
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] if the name is invalid or the preset
    /// is unusable; the engine stays where it was.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        smart_mode: bool,
        player_name: &str,
    ) -> Result<Feedback, SessionError> {
        let config = GameConfig::from_preset(&self.presets, difficulty, smart_mode, player_name)?;
        self.start_with(config)
    }

    /// Start a round from an explicit configuration
    ///
    /// # Errors
    /// Returns [`SessionError::Engine`] only if the engine refuses the start.
    pub fn start_with(&mut self, config: GameConfig) -> Result<Feedback, SessionError> {
        if self.engine.phase() != Phase::Setup {
            self.engine.reset_to_setup();
        }
        self.coach = CoachState::Idle;
        self.fun_fact = FunFactState::Idle;
        Ok(self.engine.start_round(config)?)
    }

    /// Submit a guess, recording a win on the leaderboard
    ///
    /// A failed leaderboard write is logged; the win itself stands.
    ///
    /// # Errors
    /// Returns [`SessionError::Engine`] unless a round is being played.
    pub fn guess(&mut self, value: i64) -> Result<GuessOutcome, SessionError> {
        let outcome = self.engine.submit_guess(value)?;
        if let Some(entry) = &outcome.entry {
            self.record(entry.clone());
            if let Some(round) = self.engine.round() {
                let sent = self
                    .advisor
                    .request_fun_fact(self.engine.round_id(), round.secret());
                if sent {
                    self.fun_fact = FunFactState::Pending;
                }
            }
        }
        Ok(outcome)
    }

    /// # Errors
    /// Returns [`SessionError::Engine`] unless a round is being played.
    pub fn buy_clue(&mut self, kind: ClueKind) -> Result<Feedback, SessionError> {
        Ok(self.engine.purchase_clue(kind)?)
    }

    /// Return to setup, abandoning any round in progress
    pub fn reset(&mut self) -> Feedback {
        self.coach = CoachState::Idle;
        self.fun_fact = FunFactState::Idle;
        self.engine.reset_to_setup()
    }

    /// Ask the coach to review the finished round
    ///
    /// Ignored unless the round is over and no review was already requested.
    pub fn request_coach(&mut self) -> &CoachState {
        if !self.engine.phase().is_over() || self.coach != CoachState::Idle {
            return &self.coach;
        }
        let review = match (self.engine.config(), self.engine.round()) {
            (Some(config), Some(round)) => StrategyReview {
                secret: round.secret(),
                range_min: config.min(),
                range_max: config.max(),
                guesses: round.guesses().to_vec(),
            },
            _ => return &self.coach,
        };

        self.coach = if self.advisor.request_analysis(self.engine.round_id(), review) {
            CoachState::Pending
        } else {
            CoachState::Unavailable
        };
        &self.coach
    }

    /// Apply any finished background requests for the current round
    ///
    /// Returns whether anything changed.
    pub fn poll_advisory(&mut self) -> bool {
        let updates = self.advisor.poll(self.engine.round_id());
        let changed = !updates.is_empty();
        for update in updates {
            self.apply(update);
        }
        changed
    }

    /// Block up to `timeout` for one background result
    pub fn wait_advisory(&mut self, timeout: Duration) -> bool {
        match self.advisor.wait(self.engine.round_id(), timeout) {
            Some(update) => {
                self.apply(update);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, update: AdvisoryUpdate) {
        match update {
            AdvisoryUpdate::Analysis(Some(analysis)) => self.coach = CoachState::Ready(analysis),
            AdvisoryUpdate::Analysis(None) => self.coach = CoachState::Unavailable,
            AdvisoryUpdate::FunFact(Some(fact)) => self.fun_fact = FunFactState::Ready(fact),
            AdvisoryUpdate::FunFact(None) => self.fun_fact = FunFactState::Unavailable,
        }
    }

    fn record(&mut self, entry: LeaderboardEntry) {
        debug!(name = entry.name(), score = entry.score(), "Recording win");
        if let Err(e) = self.leaderboard.append(entry) {
            warn!(error = %e, "Failed to save leaderboard");
        }
    }

    /// Best scores for a difficulty
    #[must_use]
    pub fn top_scores(&self, difficulty: Difficulty) -> Vec<&LeaderboardEntry> {
        self.leaderboard.top_n(difficulty, LEADERBOARD_SIZE)
    }

    #[inline]
    #[must_use]
    pub const fn engine(&self) -> &Engine<R, C> {
        &self.engine
    }

    #[inline]
    #[must_use]
    pub const fn leaderboard(&self) -> &LeaderboardStore<P> {
        &self.leaderboard
    }

    #[inline]
    #[must_use]
    pub const fn presets(&self) -> &PresetTable {
        &self.presets
    }

    #[inline]
    #[must_use]
    pub const fn coach(&self) -> &CoachState {
        &self.coach
    }

    #[inline]
    #[must_use]
    pub fn fun_fact(&self) -> Option<&str> {
        match &self.fun_fact {
            FunFactState::Ready(fact) => Some(fact.as_str()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn fun_fact_state(&self) -> &FunFactState {
        &self.fun_fact
    }

    #[must_use]
    pub fn advisory_available(&self) -> bool {
        self.advisor.is_available()
    }
}
