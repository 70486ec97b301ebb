//! Human-readable feedback emitted by engine transitions

use std::fmt;

/// Display class of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    /// Round start and setup prompts
    Neutral,
    /// Winning guess
    Good,
    /// Rejections and losses
    Bad,
    /// Directional hints and unlocked clues
    Info,
}

/// One feedback message and how it should be styled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    text: String,
    kind: FeedbackKind,
}

impl Feedback {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: FeedbackKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    #[must_use]
    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackKind::Neutral)
    }

    #[must_use]
    pub fn good(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackKind::Good)
    }

    #[must_use]
    pub fn bad(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackKind::Bad)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackKind::Info)
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> FeedbackKind {
        self.kind
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
