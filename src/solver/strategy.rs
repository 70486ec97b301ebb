//! Guess selection strategies
//!
//! Defines the Strategy trait and the automated players built on it.

use crate::core::math::binary_search_pivot;
use crate::engine::RoundState;
use rand::Rng;

/// A strategy for picking the next guess in a round
pub trait Strategy {
    /// Pick a guess inside the round's current bounds
    ///
    /// Returns `None` if the bounds are empty.
    fn select_guess<R: Rng>(&self, round: &RoundState, rng: &mut R) -> Option<i64>;

    /// Name used on the command line and in reports
    fn name(&self) -> &'static str;
}

/// Enum wrapper for all strategy types
///
/// Allows runtime selection of strategy while maintaining static dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Halve the remaining range every time (default, optimal)
    Pivot(PivotStrategy),
    /// Uniform pick from the remaining range
    Random(RandomStrategy),
    /// Count up from the low bound
    Linear(LinearStrategy),
}

impl Strategy for StrategyType {
    fn select_guess<R: Rng>(&self, round: &RoundState, rng: &mut R) -> Option<i64> {
        match self {
            Self::Pivot(s) => s.select_guess(round, rng),
            Self::Random(s) => s.select_guess(round, rng),
            Self::Linear(s) => s.select_guess(round, rng),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Pivot(s) => s.name(),
            Self::Random(s) => s.name(),
            Self::Linear(s) => s.name(),
        }
    }
}

impl StrategyType {
    /// Create strategy from name string
    ///
    /// Supported names: "pivot", "binary", "random", "linear", "sequential".
    /// Defaults to pivot if name is unrecognized.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Self::Random(RandomStrategy),
            "linear" | "sequential" => Self::Linear(LinearStrategy),
            _ => Self::Pivot(PivotStrategy),
        }
    }
}

impl Default for StrategyType {
    fn default() -> Self {
        Self::Pivot(PivotStrategy)
    }
}

/// Binary search over the remaining bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PivotStrategy;

impl Strategy for PivotStrategy {
    fn select_guess<R: Rng>(&self, round: &RoundState, _rng: &mut R) -> Option<i64> {
        (round.range_low() <= round.range_high())
            .then(|| binary_search_pivot(round.range_low(), round.range_high()))
    }

    fn name(&self) -> &'static str {
        "pivot"
    }
}

/// Uniformly random guess within the remaining bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn select_guess<R: Rng>(&self, round: &RoundState, rng: &mut R) -> Option<i64> {
        (round.range_low() <= round.range_high())
            .then(|| rng.random_range(round.range_low()..=round.range_high()))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Lowest value still possible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearStrategy;

impl Strategy for LinearStrategy {
    fn select_guess<R: Rng>(&self, round: &RoundState, _rng: &mut R) -> Option<i64> {
        (round.range_low() <= round.range_high()).then_some(round.range_low())
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
