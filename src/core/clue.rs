//! Purchasable clues about the secret number
//!
//! Each clue kind has a fixed cost and reveals one derived property of the
//! secret. Clues carry no state; the engine tracks which ones were bought.

use super::math::{digit_sum, is_prime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of clue a player can buy during a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClueKind {
    /// Even or odd
    Parity,
    /// Divisible by 3 or not
    DivisibleBy3,
    /// Prime or composite
    Prime,
    /// Sum of the decimal digits
    DigitSum,
}

impl ClueKind {
    /// All clue kinds in ascending cost order
    pub const ALL: [Self; 4] = [Self::Parity, Self::DivisibleBy3, Self::Prime, Self::DigitSum];

    /// Score cost of unlocking this clue
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Parity => 50,
            Self::DivisibleBy3 => 75,
            Self::Prime => 100,
            Self::DigitSum => 150,
        }
    }

    /// Short label for buttons and lists
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Parity => "Even/Odd",
            Self::DivisibleBy3 => "Div by 3",
            Self::Prime => "Prime?",
            Self::DigitSum => "Digit Sum",
        }
    }

    /// Parse a clue kind from user input
    ///
    /// Accepts the 1-based position in [`ClueKind::ALL`] or a name such as
    /// `parity`, `div3`, `prime`, `sum`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "1" | "parity" | "even" | "odd" => Some(Self::Parity),
            "2" | "div3" | "divisible" | "divisible_by_3" => Some(Self::DivisibleBy3),
            "3" | "prime" => Some(Self::Prime),
            "4" | "sum" | "digits" | "digit_sum" => Some(Self::DigitSum),
            _ => None,
        }
    }
}

impl fmt::Display for ClueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sentence describing `secret` with respect to `kind`
///
/// # Examples
/// ```
/// use guess_number::core::{ClueKind, clue_text};
///
/// assert_eq!(clue_text(ClueKind::Parity, 7), "The number is Odd.");
/// assert_eq!(clue_text(ClueKind::DigitSum, 29), "The sum of the digits is 11.");
/// ```
#[must_use]
pub fn clue_text(kind: ClueKind, secret: i64) -> String {
    match kind {
        ClueKind::Parity => {
            if secret % 2 == 0 {
                "The number is Even.".to_string()
            } else {
                "The number is Odd.".to_string()
            }
        }
        ClueKind::Prime => {
            if is_prime(secret) {
                "The number is Prime.".to_string()
            } else {
                "The number is Composite (not prime).".to_string()
            }
        }
        ClueKind::DivisibleBy3 => {
            if secret % 3 == 0 {
                "The number is divisible by 3.".to_string()
            } else {
                "The number is NOT divisible by 3.".to_string()
            }
        }
        ClueKind::DigitSum => format!("The sum of the digits is {}.", digit_sum(secret)),
    }
}
