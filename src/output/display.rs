//! Display functions for command results

use super::formatters::create_progress_bar;
use crate::commands::SimulationResult;
use crate::core::Difficulty;
use crate::engine::{Feedback, FeedbackKind};
use crate::leaderboard::LeaderboardEntry;
use colored::{ColoredString, Colorize};

/// Feedback text colored by its classification
#[must_use]
pub fn colored_feedback(feedback: &Feedback) -> ColoredString {
    let text = feedback.text();
    match feedback.kind() {
        FeedbackKind::Neutral => text.bright_white(),
        FeedbackKind::Good => text.bright_green().bold(),
        FeedbackKind::Bad => text.red().bold(),
        FeedbackKind::Info => text.bright_cyan(),
    }
}

/// Print the best scores for one difficulty
pub fn print_leaderboard(difficulty: Difficulty, entries: &[&LeaderboardEntry]) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "LEADERBOARD:".bright_cyan().bold(),
        difficulty.as_str().bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());

    if entries.is_empty() {
        println!("\n   {}", "No scores yet. Be the first!".bright_black());
        return;
    }

    println!();
    for (i, entry) in entries.iter().enumerate() {
        let rank = format!("{:>2}.", i + 1);
        let rank = match i {
            0 => rank.bright_yellow().bold(),
            1 | 2 => rank.yellow(),
            _ => rank.bright_black(),
        };
        println!(
            "   {rank} {:<12} {:>5}  {} guesses  {}",
            entry.name().bright_white(),
            entry.score().to_string().bright_green().bold(),
            entry.guesses(),
            entry
                .completed_at()
                .format("%Y-%m-%d")
                .to_string()
                .bright_black()
        );
    }
}

/// Print the result of a simulation
pub fn print_simulation_result(result: &SimulationResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "SIMULATION RESULTS:".bright_cyan().bold(),
        result.strategy.bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());

    println!("\n📊 {}", "Performance:".bright_cyan().bold());
    println!("   Rounds played:    {}", result.rounds);
    let rate = format!("{:.1}%", result.win_rate);
    let rate = if result.win_rate >= 99.9 {
        rate.bright_green().bold()
    } else if result.win_rate >= 50.0 {
        rate.yellow()
    } else {
        rate.red()
    };
    println!("   Win rate:         {rate} ({} won, {} lost)", result.wins, result.losses);
    println!(
        "   Average guesses:  {} (optimal worst case {})",
        format!("{:.2}", result.average_guesses)
            .bright_yellow()
            .bold(),
        result.optimal_guesses
    );
    println!(
        "   Average score:    {}",
        format!("{:.1}", result.average_score).bright_green()
    );
    if result.wins > 0 {
        println!(
            "   Best case:        {}",
            format!("{}", result.min_guesses).green()
        );
        println!(
            "   Worst case:       {}",
            format!("{}", result.max_guesses).yellow()
        );
    }
    println!("   Time taken:       {:.2}s", result.duration.as_secs_f64());
    println!("   Rounds/second:    {:.1}", result.rounds_per_second);

    if result.wins == 0 {
        return;
    }

    println!("\n📈 {}", "Distribution:".bright_cyan().bold());
    let max_count = result.distribution.values().copied().max().unwrap_or(1);
    for guess_count in 1..=result.max_allowed {
        if let Some(&count) = result.distribution.get(&guess_count) {
            let pct = count as f64 / result.wins as f64 * 100.0;
            let bar = create_progress_bar(count as f64, max_count as f64, 40);
            println!("   {guess_count:>2}: {} {count:5} ({pct:5.1}%)", bar.green());
        }
    }
}
