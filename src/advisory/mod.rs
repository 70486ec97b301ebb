//! Optional post-game coaching
//!
//! An advisory provider reviews a finished round and can produce a fun fact
//! about the secret. Providers are best-effort: every failure collapses to
//! `None`, and nothing they return feeds back into scoring or the leaderboard.

mod dispatch;
mod gemini;

pub use dispatch::{AdvisoryDispatcher, AdvisoryUpdate};
pub use gemini::{AdvisoryError, DEFAULT_MODEL, GeminiAdvisor};

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Environment variables checked, in order, for the service credential
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Environment variable overriding the model name
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// A finished round submitted for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReview {
    pub secret: i64,
    pub range_min: i64,
    pub range_max: i64,
    pub guesses: Vec<i64>,
}

/// Coach verdict on a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub feedback: String,
    /// Stars, 1 through 5
    pub rating: u8,
}

impl Analysis {
    pub const MAX_RATING: u8 = 5;

    /// Build an analysis, clamping the rating into 1..=5
    ///
    /// A NaN rating counts as one star.
    #[must_use]
    pub fn new(feedback: impl Into<String>, rating: f64) -> Self {
        let rating = if rating.is_nan() {
            1
        } else {
            rating.round().clamp(1.0, f64::from(Self::MAX_RATING)) as u8
        };
        Self {
            feedback: feedback.into(),
            rating,
        }
    }

    /// Rating as filled and empty stars
    #[must_use]
    pub fn stars(&self) -> String {
        (0..Self::MAX_RATING)
            .map(|i| if i < self.rating { '★' } else { '☆' })
            .collect()
    }
}

/// A source of non-authoritative coaching
pub trait AdvisoryProvider: Send + Sync {
    /// Whether calls can reach a service at all
    fn is_available(&self) -> bool {
        true
    }

    /// Review how close the guesses came to an optimal binary search
    fn analyze_strategy(&self, review: &StrategyReview) -> Option<Analysis>;

    /// A short fun fact about `number`
    fn fun_fact(&self, number: i64) -> Option<String>;
}

/// Provider used when no credential is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdvisor;

impl AdvisoryProvider for NullAdvisor {
    fn is_available(&self) -> bool {
        false
    }

    fn analyze_strategy(&self, _review: &StrategyReview) -> Option<Analysis> {
        None
    }

    fn fun_fact(&self, _number: i64) -> Option<String> {
        None
    }
}

/// Pick a provider from the environment
///
/// Uses Gemini when one of [`API_KEY_VARS`] is set and non-empty, otherwise
/// the null provider.
#[must_use]
pub fn provider_from_env() -> Arc<dyn AdvisoryProvider> {
    let key = API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty());

    match key {
        Some(key) => {
            let model = std::env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
            info!(%model, "Advisory service configured");
            match GeminiAdvisor::new(key, model) {
                Ok(advisor) => Arc::new(advisor),
                Err(e) => {
                    warn!(error = %e, "Advisory client unavailable, coaching disabled");
                    Arc::new(NullAdvisor)
                }
            }
        }
        None => {
            info!("No advisory credential, coaching disabled");
            Arc::new(NullAdvisor)
        }
    }
}
