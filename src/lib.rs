//! Guess The Number
//!
//! A number guessing game with a clue economy, time-and-efficiency scoring, a
//! persisted leaderboard and optional post-game coaching.
//!
//! # Quick Start
//!
//! ```rust
//! use guess_number::core::{Difficulty, GameConfig};
//! use guess_number::engine::{Engine, ManualClock, Phase};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut engine = Engine::new(StdRng::seed_from_u64(1), ManualClock::default());
//! let config = GameConfig::new(1, 10, Difficulty::Easy, 3, false, "ada").unwrap();
//! engine.start_round_with_secret(config, 7).unwrap();
//!
//! assert_eq!(engine.submit_guess(5).unwrap().feedback.text(), "Too Low");
//! assert_eq!(engine.submit_guess(7).unwrap().feedback.text(), "Correct!");
//! assert_eq!(engine.phase(), Phase::Won);
//! ```

// Core domain types
pub mod core;

// Round state machine
pub mod engine;

// Persisted scores
pub mod leaderboard;

// Optional coaching service
pub mod advisory;

// Engine, leaderboard and coaching together
pub mod session;

// Automated players
pub mod solver;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

// Tracing setup
pub mod logging;
