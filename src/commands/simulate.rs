//! Simulation command
//!
//! Plays many automated rounds in parallel and collects statistics.

use crate::core::GameConfig;
use crate::solver::{RoundResult, Solver, Strategy};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Statistics from a simulation run
#[derive(Debug)]
pub struct SimulationResult {
    pub strategy: &'static str,
    pub rounds: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    /// Mean guesses over won rounds
    pub average_guesses: f64,
    /// Mean final score over won rounds
    pub average_score: f64,
    pub min_guesses: usize,
    pub max_guesses: usize,
    /// Guess counts of won rounds
    pub distribution: FxHashMap<usize, usize>,
    pub max_allowed: usize,
    pub optimal_guesses: u32,
    pub duration: Duration,
    pub rounds_per_second: f64,
}

/// Run `rounds` automated rounds, round `i` seeded with `seed + i`
///
/// Rounds the engine refuses are logged and left out of the totals.
pub fn run_simulation<S: Strategy + Sync>(
    solver: &Solver<S>,
    config: &GameConfig,
    rounds: usize,
    seed: u64,
    show_progress: bool,
) -> SimulationResult {
    let pb = if show_progress {
        let pb = ProgressBar::new(rounds as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
        {
            pb.set_style(style.progress_chars("█▓▒░"));
        }
        pb.set_message(format!("{} on {}", solver.strategy().name(), config.difficulty()));
        pb
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let results: Vec<RoundResult> = (0..rounds as u64)
        .into_par_iter()
        .filter_map(|i| {
            let result = solver.play_round(config, seed.wrapping_add(i));
            pb.inc(1);
            if result.is_none() {
                warn!(round = i, "Simulated round did not complete");
            }
            result
        })
        .collect();
    pb.finish_with_message("Complete!");

    let result = summarize(solver.strategy().name(), config, &results, start.elapsed());
    info!(
        strategy = result.strategy,
        rounds = result.rounds,
        win_rate = result.win_rate,
        "Simulation finished"
    );
    result
}

fn summarize(
    strategy: &'static str,
    config: &GameConfig,
    results: &[RoundResult],
    duration: Duration,
) -> SimulationResult {
    let won: Vec<&RoundResult> = results.iter().filter(|r| r.won).collect();
    let wins = won.len();
    let rounds = results.len();

    let mut distribution = FxHashMap::default();
    for r in &won {
        *distribution.entry(r.guesses).or_insert(0) += 1;
    }

    let mean = |total: f64| if wins > 0 { total / wins as f64 } else { 0.0 };

    SimulationResult {
        strategy,
        rounds,
        wins,
        losses: rounds - wins,
        win_rate: if rounds > 0 {
            wins as f64 / rounds as f64 * 100.0
        } else {
            0.0
        },
        average_guesses: mean(won.iter().map(|r| r.guesses as f64).sum()),
        average_score: mean(won.iter().map(|r| f64::from(r.score)).sum()),
        min_guesses: won.iter().map(|r| r.guesses).min().unwrap_or(0),
        max_guesses: won.iter().map(|r| r.guesses).max().unwrap_or(0),
        distribution,
        max_allowed: config.max_guesses(),
        optimal_guesses: crate::core::math::expected_guess_count(config.min(), config.max()),
        duration,
        rounds_per_second: rounds as f64 / duration.as_secs_f64().max(f64::EPSILON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, PresetTable};
    use crate::solver::{LinearStrategy, PivotStrategy, RandomStrategy};

    fn config(difficulty: Difficulty) -> GameConfig {
        GameConfig::from_preset(&PresetTable::default(), difficulty, false, "bot").unwrap()
    }

    #[test]
    fn pivot_wins_every_round() {
        let result = run_simulation(
            &Solver::new(PivotStrategy),
            &config(Difficulty::Medium),
            200,
            1,
            false,
        );

        assert_eq!(result.rounds, 200);
        assert_eq!(result.wins, 200);
        assert!((result.win_rate - 100.0).abs() < f64::EPSILON);
        assert!(result.max_guesses <= result.optimal_guesses as usize);
        assert!((result.average_score - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distribution_sums_to_wins() {
        let result = run_simulation(
            &Solver::new(RandomStrategy),
            &config(Difficulty::Hard),
            150,
            7,
            false,
        );

        let sum: usize = result.distribution.values().sum();
        assert_eq!(sum, result.wins);
        assert_eq!(result.wins + result.losses, result.rounds);
        assert!(result.distribution.keys().all(|&g| (1..=10).contains(&g)));
    }

    #[test]
    fn results_are_reproducible_for_a_seed() {
        let solver = Solver::new(RandomStrategy);
        let config = config(Difficulty::Easy);
        let a = run_simulation(&solver, &config, 64, 99, false);
        let b = run_simulation(&solver, &config, 64, 99, false);
        assert_eq!(a.wins, b.wins);
        assert_eq!(a.distribution, b.distribution);
    }

    #[test]
    fn linear_is_worse_than_pivot() {
        let config = config(Difficulty::Hard);
        let linear = run_simulation(&Solver::new(LinearStrategy), &config, 100, 3, false);
        let pivot = run_simulation(&Solver::new(PivotStrategy), &config, 100, 3, false);
        assert!(linear.win_rate < pivot.win_rate);
    }

    #[test]
    fn empty_run_has_zero_stats() {
        let result = run_simulation(
            &Solver::new(PivotStrategy),
            &config(Difficulty::Easy),
            0,
            0,
            false,
        );
        assert_eq!(result.rounds, 0);
        assert!(result.win_rate.abs() < f64::EPSILON);
        assert!(result.distribution.is_empty());
    }
}
