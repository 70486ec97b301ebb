//! Core domain types for the guessing game
//!
//! Pure numeric helpers, the clue catalog, and round configuration. Nothing in
//! here performs I/O except loading a preset table from disk.

mod clue;
mod config;
pub mod math;

pub use clue::{ClueKind, clue_text};
pub use config::{ConfigError, Difficulty, GameConfig, MAX_NAME_LEN, Preset, PresetTable};
