//! Persisted leaderboard of won rounds

mod entry;
mod store;

pub use entry::LeaderboardEntry;
pub use store::{
    DEFAULT_FILE, JsonFilePersistence, LeaderboardError, LeaderboardPersistence,
    LeaderboardStore, MemoryPersistence,
};
