//! Append-only leaderboard and its persistence backends

use super::entry::LeaderboardEntry;
use crate::core::Difficulty;
use derive_more::{Display, Error, From};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Default file for the JSON backend, named after the leaderboard's storage key
pub const DEFAULT_FILE: &str = "gtn_leaderboard.json";

/// Failure to read or write persisted leaderboard data
#[derive(Debug, Display, Error, From)]
pub enum LeaderboardError {
    #[display("Leaderboard I/O failed: {_0}")]
    Io(io::Error),
    #[display("Leaderboard data is malformed: {_0}")]
    Json(serde_json::Error),
}

/// Durable storage for the full list of entries
///
/// The store always loads and saves the whole list.
pub trait LeaderboardPersistence {
    /// Read every stored entry
    ///
    /// # Errors
    /// Returns an error if the data cannot be read or parsed.
    fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Replace the stored list
    ///
    /// # Errors
    /// Returns an error if the data cannot be written.
    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError>;
}

/// JSON array in a file on disk
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardPersistence for JsonFilePersistence {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No leaderboard file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display(), count = entries.len()))]
    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Leaderboard saved");
        Ok(())
    }
}

/// In-memory backend holding the serialized text
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    contents: RefCell<Option<String>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored text, valid or not
    #[must_use]
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(text.into())),
        }
    }

    /// Current stored text, if anything was ever saved
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl LeaderboardPersistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        match self.contents.borrow().as_deref() {
            Some(text) => Ok(serde_json::from_str(text)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        *self.contents.borrow_mut() = Some(serde_json::to_string(entries)?);
        Ok(())
    }
}

/// Ranked record of won rounds
///
/// Entries are only ever appended. Rankings are computed from the full list on
/// every query.
#[derive(Debug)]
pub struct LeaderboardStore<P: LeaderboardPersistence> {
    persistence: P,
    entries: Vec<LeaderboardEntry>,
}

impl<P: LeaderboardPersistence> LeaderboardStore<P> {
    /// Load the stored entries
    ///
    /// Unreadable or malformed data is logged and treated as an empty
    /// leaderboard.
    pub fn open(persistence: P) -> Self {
        let entries = match persistence.load() {
            Ok(entries) => {
                info!(count = entries.len(), "Loaded leaderboard");
                entries
            }
            Err(e) => {
                warn!(error = %e, "Failed to load leaderboard, starting empty");
                Vec::new()
            }
        };

        Self {
            persistence,
            entries,
        }
    }

    /// Add an entry and rewrite storage
    ///
    /// The entry stays in memory even when the write fails.
    ///
    /// # Errors
    /// Returns an error if the persistence backend cannot save the list.
    pub fn append(&mut self, entry: LeaderboardEntry) -> Result<(), LeaderboardError> {
        debug!(name = entry.name(), score = entry.score(), "Appending leaderboard entry");
        self.entries.push(entry);
        self.persistence.save(&self.entries)
    }

    /// Best `n` entries for a difficulty, highest score first
    ///
    /// Equal scores keep insertion order.
    #[must_use]
    pub fn top_n(&self, difficulty: Difficulty, n: usize) -> Vec<&LeaderboardEntry> {
        let mut ranked: Vec<&LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.difficulty() == difficulty)
            .collect();
        ranked.sort_by(|a, b| b.score().cmp(&a.score()));
        ranked.truncate(n);
        ranked
    }

    /// All entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }
}
