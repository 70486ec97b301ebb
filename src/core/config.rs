//! Round configuration and difficulty presets
//!
//! A [`GameConfig`] is validated when it is built and never changes during a
//! round. Presets are plain data handed to the engine; the default table can be
//! replaced from a TOML file.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 12;

/// Reasons a round configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// Player name is blank after trimming
    #[display("Please enter your name!")]
    EmptyName,
    /// Player name exceeds [`MAX_NAME_LEN`]
    #[display("Name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// `min` is not strictly below `max`
    #[display("Range {min} - {max} is empty")]
    EmptyRange { min: i64, max: i64 },
    /// `max_guesses` is zero
    #[display("At least one guess is required")]
    NoGuesses,
    /// Preset file could not be read or parsed
    #[display("Cannot load presets from {path}: {reason}")]
    PresetFile { path: String, reason: String },
}

/// Difficulty tier of a round
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Upper-case tag used in storage and headers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Parse a difficulty name, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Self::Easy),
            "medium" | "m" => Some(Self::Medium),
            "hard" | "h" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Next tier, wrapping around
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    /// Previous tier, wrapping around
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Easy => Self::Hard,
            Self::Medium => Self::Easy,
            Self::Hard => Self::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range and try budget for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub min: i64,
    pub max: i64,
    pub max_guesses: usize,
}

impl Preset {
    #[must_use]
    pub const fn new(min: i64, max: i64, max_guesses: usize) -> Self {
        Self {
            min,
            max,
            max_guesses,
        }
    }
}

/// One preset per difficulty tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTable {
    pub easy: Preset,
    pub medium: Preset,
    pub hard: Preset,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            easy: Preset::new(1, 10, 3),
            medium: Preset::new(1, 30, 7),
            hard: Preset::new(1, 50, 10),
        }
    }
}

impl PresetTable {
    /// Preset for a difficulty tier
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> Preset {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Parse a preset table from TOML
    ///
    /// ```
    /// use guess_number::core::{Difficulty, PresetTable};
    ///
    /// let table = PresetTable::from_toml(
    ///     "[easy]\nmin = 1\nmax = 5\nmax_guesses = 2\n\
    ///      [medium]\nmin = 1\nmax = 30\nmax_guesses = 7\n\
    ///      [hard]\nmin = 1\nmax = 100\nmax_guesses = 7\n",
    /// )
    /// .unwrap();
    /// assert_eq!(table.get(Difficulty::Hard).max, 100);
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::PresetFile`] if the text is not a valid table or
    /// any preset has an empty range or no guesses.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let table: Self = toml::from_str(text).map_err(|e| ConfigError::PresetFile {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;

        for difficulty in Difficulty::ALL {
            let preset = table.get(difficulty);
            if preset.min >= preset.max || preset.max_guesses == 0 {
                return Err(ConfigError::PresetFile {
                    path: "<inline>".to_string(),
                    reason: format!("{difficulty} preset is invalid"),
                });
            }
        }

        Ok(table)
    }

    /// Load a preset table from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::PresetFile`] if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let with_path = |reason: String| ConfigError::PresetFile {
            path: path.display().to_string(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| with_path(e.to_string()))?;
        let table = Self::from_toml(&text).map_err(|e| match e {
            ConfigError::PresetFile { reason, .. } => with_path(reason),
            other => other,
        })?;

        debug!(?table, "Loaded preset table");
        Ok(table)
    }
}

/// Immutable settings for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    min: i64,
    max: i64,
    difficulty: Difficulty,
    max_guesses: usize,
    smart_mode: bool,
    player_name: String,
}

impl GameConfig {
    /// Build a validated configuration
    ///
    /// The player name is trimmed before validation.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the name is blank or longer than
    /// [`MAX_NAME_LEN`], if `min >= max`, or if `max_guesses` is zero.
    pub fn new(
        min: i64,
        max: i64,
        difficulty: Difficulty,
        max_guesses: usize,
        smart_mode: bool,
        player_name: &str,
    ) -> Result<Self, ConfigError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if player_name.chars().count() > MAX_NAME_LEN {
            return Err(ConfigError::NameTooLong { max: MAX_NAME_LEN });
        }
        if min >= max {
            return Err(ConfigError::EmptyRange { min, max });
        }
        if max_guesses == 0 {
            return Err(ConfigError::NoGuesses);
        }

        Ok(Self {
            min,
            max,
            difficulty,
            max_guesses,
            smart_mode,
            player_name: player_name.to_string(),
        })
    }

    /// Build a configuration from a difficulty preset
    ///
    /// # Errors
    /// Same as [`GameConfig::new`].
    pub fn from_preset(
        presets: &PresetTable,
        difficulty: Difficulty,
        smart_mode: bool,
        player_name: &str,
    ) -> Result<Self, ConfigError> {
        let preset = presets.get(difficulty);
        Self::new(
            preset.min,
            preset.max,
            difficulty,
            preset.max_guesses,
            smart_mode,
            player_name,
        )
    }

    #[inline]
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    #[inline]
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    #[inline]
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    #[must_use]
    pub const fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    #[inline]
    #[must_use]
    pub const fn smart_mode(&self) -> bool {
        self.smart_mode
    }

    #[inline]
    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Number of integers in the full range
    #[must_use]
    pub const fn range_size(&self) -> u64 {
        super::math::range_size(self.min, self.max)
    }

    /// Whether `value` lies in `[min, max]`
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presets() {
        let presets = PresetTable::default();
        assert_eq!(presets.get(Difficulty::Easy), Preset::new(1, 10, 3));
        assert_eq!(presets.get(Difficulty::Medium), Preset::new(1, 30, 7));
        assert_eq!(presets.get(Difficulty::Hard), Preset::new(1, 50, 10));
    }

    #[test]
    fn config_from_preset_trims_name() {
        let config =
            GameConfig::from_preset(&PresetTable::default(), Difficulty::Hard, true, "  ada ")
                .unwrap();
        assert_eq!(config.player_name(), "ada");
        assert_eq!(config.min(), 1);
        assert_eq!(config.max(), 50);
        assert_eq!(config.max_guesses(), 10);
        assert!(config.smart_mode());
        assert_eq!(config.range_size(), 50);
    }

    #[test]
    fn config_rejects_blank_name() {
        assert_eq!(
            GameConfig::new(1, 10, Difficulty::Easy, 3, false, "   "),
            Err(ConfigError::EmptyName)
        );
    }

    #[test]
    fn config_rejects_long_name() {
        assert_eq!(
            GameConfig::new(1, 10, Difficulty::Easy, 3, false, "abcdefghijklm"),
            Err(ConfigError::NameTooLong { max: 12 })
        );
        assert!(GameConfig::new(1, 10, Difficulty::Easy, 3, false, "abcdefghijkl").is_ok());
    }

    #[test]
    fn config_rejects_empty_range_and_zero_guesses() {
        assert_eq!(
            GameConfig::new(10, 10, Difficulty::Easy, 3, false, "bo"),
            Err(ConfigError::EmptyRange { min: 10, max: 10 })
        );
        assert_eq!(
            GameConfig::new(1, 10, Difficulty::Easy, 0, false, "bo"),
            Err(ConfigError::NoGuesses)
        );
    }

    #[test]
    fn difficulty_names_and_cycle() {
        assert_eq!(Difficulty::from_name("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("e"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("nightmare"), None);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.previous(), Difficulty::Hard);
        assert_eq!(Difficulty::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn preset_toml_rejects_invalid_tier() {
        let text = "[easy]\nmin = 5\nmax = 5\nmax_guesses = 2\n\
                    [medium]\nmin = 1\nmax = 30\nmax_guesses = 7\n\
                    [hard]\nmin = 1\nmax = 50\nmax_guesses = 10\n";
        assert!(matches!(
            PresetTable::from_toml(text),
            Err(ConfigError::PresetFile { .. })
        ));
    }

    #[test]
    fn preset_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(
            &path,
            "[easy]\nmin = 1\nmax = 20\nmax_guesses = 4\n\
             [medium]\nmin = 1\nmax = 30\nmax_guesses = 7\n\
             [hard]\nmin = 1\nmax = 50\nmax_guesses = 10\n",
        )
        .unwrap();

        let table = PresetTable::load(&path).unwrap();
        assert_eq!(table.get(Difficulty::Easy), Preset::new(1, 20, 4));

        let missing = PresetTable::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::PresetFile { .. })));
    }
}
