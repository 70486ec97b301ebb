//! Automated guessing
//!
//! Strategies that play rounds through the engine, used by the simulation
//! command to compare approaches.

mod runner;
pub mod strategy;

pub use runner::{RoundResult, Solver};
pub use strategy::{LinearStrategy, PivotStrategy, RandomStrategy, Strategy, StrategyType};
