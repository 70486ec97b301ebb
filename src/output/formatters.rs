//! Formatting utilities for terminal output

use crate::core::math::range_size;
use crate::engine::GuessVerdict;

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64).max(0.0) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar over `[min, max]` with the still-possible window `[low, high]` filled
#[must_use]
pub fn range_bar(min: i64, max: i64, low: i64, high: i64, width: usize) -> String {
    let span = range_size(min, max) as f64;
    if span <= 0.0 || width == 0 {
        return String::new();
    }
    let cell = |value: i64| ((value.abs_diff(min) as f64 / span) * width as f64) as usize;
    let start = cell(low).min(width);
    let end = (cell(high) + 1).clamp(start, width);

    format!(
        "{}{}{}",
        "░".repeat(start),
        "█".repeat(end - start),
        "░".repeat(width - end)
    )
}

/// Marker for a guess in the history list
#[must_use]
pub const fn verdict_marker(verdict: GuessVerdict) -> &'static str {
    match verdict {
        GuessVerdict::Match => "✓",
        GuessVerdict::TooLow => "↑",
        GuessVerdict::TooHigh => "↓",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        assert_eq!(create_progress_bar(0.0, 100.0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(create_progress_bar(100.0, 100.0, 10), "██████████");
    }

    #[test]
    fn progress_bar_half() {
        assert_eq!(create_progress_bar(50.0, 100.0, 10), "█████░░░░░");
    }

    #[test]
    fn progress_bar_zero_max() {
        assert_eq!(create_progress_bar(3.0, 0.0, 4), "░░░░");
    }

    #[test]
    fn range_bar_full_window() {
        assert_eq!(range_bar(1, 10, 1, 10, 10), "██████████");
    }

    #[test]
    fn range_bar_narrowed_window() {
        assert_eq!(range_bar(1, 10, 4, 6, 10), "░░░███░░░░");
    }

    #[test]
    fn range_bar_single_value_still_visible() {
        let bar = range_bar(1, 50, 50, 50, 10);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.ends_with('█'));
    }

    #[test]
    fn range_bar_handles_full_i64_range() {
        let bar = range_bar(i64::MIN, i64::MAX, 0, i64::MAX, 8);
        assert_eq!(bar, "░░░░████");
    }

    #[test]
    fn markers_point_toward_secret() {
        assert_eq!(verdict_marker(GuessVerdict::TooLow), "↑");
        assert_eq!(verdict_marker(GuessVerdict::TooHigh), "↓");
        assert_eq!(verdict_marker(GuessVerdict::Match), "✓");
    }
}
