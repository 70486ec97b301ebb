//! Game engine
//!
//! Owns the state of the round in progress and applies guesses, clue
//! purchases and lifecycle transitions to it. Rendering layers only call into
//! the engine and redraw from its accessors.

mod clock;
mod feedback;
mod game;
mod round;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feedback::{Feedback, FeedbackKind};
pub use game::{Engine, EngineError, GuessOutcome, Phase};
pub use round::{GuessVerdict, RoundState, SmartHint};
