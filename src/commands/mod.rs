//! Command implementations

pub mod leaderboard;
pub mod simple;
pub mod simulate;

pub use leaderboard::{LeaderboardReport, query_leaderboard};
pub use simple::run_simple;
pub use simulate::{SimulationResult, run_simulation};
