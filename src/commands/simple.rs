//! Simple interactive CLI mode
//!
//! Line-based game without TUI

use crate::core::{ClueKind, Difficulty, MAX_NAME_LEN};
use crate::engine::{Clock, Phase};
use crate::leaderboard::LeaderboardPersistence;
use crate::output::colored_feedback;
use crate::output::formatters::{range_bar, verdict_marker};
use crate::session::{CoachState, FunFactState, Session};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

const ADVISORY_WAIT: Duration = Duration::from_secs(15);

enum Next {
    Again,
    Quit,
}

/// Run the simple interactive CLI mode
///
/// Reads commands from `input` and writes the game to `out` until the player
/// quits or input ends.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_simple<P, R, C>(
    session: &mut Session<P, R, C>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<()>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                 Guess The Number - Line Mode                 ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝\n")?;

    let Some(name) = prompt_name(input, out)? else {
        return Ok(());
    };

    loop {
        let Some(difficulty) = prompt_difficulty(session, input, out)? else {
            return Ok(());
        };
        let Some(smart) = prompt(input, out, "Smart mode? (y/N)")? else {
            return Ok(());
        };
        let smart = matches!(smart.to_lowercase().as_str(), "y" | "yes");

        match session.start(difficulty, smart, &name) {
            Ok(feedback) => writeln!(out, "\n{}", colored_feedback(&feedback))?,
            Err(e) => {
                writeln!(out, "{}", e.to_string().red())?;
                return Ok(());
            }
        }
        print_help(out)?;

        match play_round(session, input, out)? {
            Next::Quit => break,
            Next::Again => {}
        }
    }

    writeln!(out, "\n👋 Thanks for playing!\n")?;
    Ok(())
}

fn play_round<P, R, C>(
    session: &mut Session<P, R, C>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Next>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    while session.engine().phase() == Phase::Playing {
        print_status(session, out)?;

        let Some(line) = prompt(input, out, "Guess (or command)")? else {
            return Ok(Next::Quit);
        };
        let lower = line.to_lowercase();
        let mut words = lower.split_whitespace();

        let result = match (words.next(), words.next()) {
            (Some("quit" | "q" | "exit"), _) => return Ok(Next::Quit),
            (Some("new" | "n"), _) => {
                session.reset();
                writeln!(out, "\n🔄 New game!\n")?;
                return Ok(Next::Again);
            }
            (Some("help" | "h" | "?"), _) => {
                print_help(out)?;
                continue;
            }
            (Some("clue" | "c"), Some(which)) => match ClueKind::from_name(which) {
                Some(kind) => session.buy_clue(kind),
                None => {
                    writeln!(out, "{}", "Unknown clue. Try 1-4.".red())?;
                    continue;
                }
            },
            (Some(value), None) => match value.parse::<i64>() {
                Ok(value) => session.guess(value).map(|outcome| outcome.feedback),
                Err(_) => {
                    writeln!(out, "{}", "Enter a whole number.".red())?;
                    continue;
                }
            },
            _ => continue,
        };

        match result {
            Ok(feedback) => writeln!(out, "\n  {}\n", colored_feedback(&feedback))?,
            Err(e) => writeln!(out, "{}", e.to_string().red())?,
        }
    }

    print_summary(session, out)?;
    offer_coaching(session, input, out)
}

fn print_status<P, R, C>(session: &Session<P, R, C>, out: &mut impl Write) -> io::Result<()>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = session.engine();
    let (Some(config), Some(round)) = (engine.config(), engine.round()) else {
        return Ok(());
    };

    writeln!(out, "────────────────────────────────────────────────────────────")?;
    writeln!(
        out,
        "Range {}-{} [{}]  Score {}  Tries left {}",
        round.range_low(),
        round.range_high(),
        range_bar(config.min(), config.max(), round.range_low(), round.range_high(), 30).cyan(),
        round.score().to_string().bright_green(),
        engine.tries_remaining().to_string().bright_yellow()
    )?;

    let history: Vec<String> = round
        .history()
        .map(|(guess, verdict)| format!("{guess}{}", verdict_marker(verdict)))
        .collect();
    if !history.is_empty() {
        writeln!(out, "History: {}", history.join("  ").bright_black())?;
    }

    for kind in round.unlocked_clues() {
        if let Some(text) = engine.clue_text(kind) {
            writeln!(out, "🔍 {}", text.bright_cyan())?;
        }
    }

    if let Some(hint) = engine.smart_hint() {
        writeln!(
            out,
            "🧠 Hit chance {:.1}%  Optimal guess {}",
            hint.probability_percent,
            hint.optimal_guess.to_string().bright_yellow().bold()
        )?;
    }
    writeln!(out, "────────────────────────────────────────────────────────────")
}

fn print_summary<P, R, C>(session: &Session<P, R, C>, out: &mut impl Write) -> io::Result<()>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = session.engine();
    let (Some(config), Some(round)) = (engine.config(), engine.round()) else {
        return Ok(());
    };

    writeln!(out, "\n{}", "═".repeat(60).bright_cyan())?;
    if engine.phase() == Phase::Won {
        writeln!(
            out,
            "{}",
            "    🎉  C O R R E C T !  🎉    ".bright_green().bold()
        )?;
        writeln!(
            out,
            "\n  Found {} in {} {}, final score {}",
            round.secret().to_string().bright_yellow().bold(),
            round.guesses().len(),
            if round.guesses().len() == 1 { "guess" } else { "guesses" },
            round.score().to_string().bright_green().bold()
        )?;
    } else {
        writeln!(out, "{}", "    💀  G A M E   O V E R  💀    ".red().bold())?;
        writeln!(
            out,
            "\n  The number was {}",
            round.secret().to_string().bright_yellow().bold()
        )?;
    }
    writeln!(out, "{}", "═".repeat(60).bright_cyan())?;

    let top = session.top_scores(config.difficulty());
    if !top.is_empty() {
        writeln!(out, "\n🏆 Top scores ({})", config.difficulty())?;
        for (i, entry) in top.iter().enumerate() {
            writeln!(out, "  {:>2}. {:<12} {:>5}", i + 1, entry.name(), entry.score())?;
        }
    }
    Ok(())
}

fn offer_coaching<P, R, C>(
    session: &mut Session<P, R, C>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Next>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    if session.engine().phase() == Phase::Won && session.advisory_available() {
        wait_with_spinner(session, "Finding a fun fact...", |s| {
            s.fun_fact_state() != &FunFactState::Pending
        });
        if let Some(fact) = session.fun_fact() {
            writeln!(out, "\n💡 {}", fact.bright_magenta())?;
        }
    }

    loop {
        let question = if session.advisory_available() {
            "\n[p]lay again, [a]nalyze strategy, or [q]uit"
        } else {
            "\n[p]lay again or [q]uit"
        };
        let Some(choice) = prompt(input, out, question)? else {
            return Ok(Next::Quit);
        };

        match choice.to_lowercase().as_str() {
            "p" | "play" | "y" | "yes" => {
                session.reset();
                return Ok(Next::Again);
            }
            "a" | "analyze" if session.advisory_available() => {
                if session.request_coach() == &CoachState::Pending {
                    wait_with_spinner(session, "Coach is thinking...", |s| {
                        !matches!(s.coach(), CoachState::Pending)
                    });
                }
                match session.coach() {
                    CoachState::Ready(analysis) => {
                        writeln!(
                            out,
                            "\n🎓 {}\n   {}",
                            analysis.stars().bright_yellow(),
                            analysis.feedback
                        )?;
                    }
                    CoachState::Pending => writeln!(out, "{}", "Coach is still thinking.".yellow())?,
                    CoachState::Idle | CoachState::Unavailable => {
                        writeln!(out, "{}", "Analysis unavailable.".bright_black())?;
                    }
                }
            }
            _ => return Ok(Next::Quit),
        }
    }
}

fn wait_with_spinner<P, R, C>(
    session: &mut Session<P, R, C>,
    message: &'static str,
    done: impl Fn(&Session<P, R, C>) -> bool,
) where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let deadline = Instant::now() + ADVISORY_WAIT;
    while !done(session) {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() || !session.wait_advisory(left) {
            break;
        }
    }
    spinner.finish_and_clear();
}

fn prompt_name(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<String>> {
    loop {
        let Some(name) = prompt(input, out, "Your name")? else {
            return Ok(None);
        };
        let len = name.chars().count();
        if len == 0 {
            writeln!(out, "{}", "Please enter your name!".red())?;
        } else if len > MAX_NAME_LEN {
            writeln!(
                out,
                "{}",
                format!("Name must be at most {MAX_NAME_LEN} characters").red()
            )?;
        } else {
            return Ok(Some(name));
        }
    }
}

fn prompt_difficulty<P, R, C>(
    session: &Session<P, R, C>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Option<Difficulty>>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let preset = session.presets().get(difficulty);
        writeln!(
            out,
            "  {}. {:<6} {}-{}, {} tries",
            i + 1,
            difficulty.as_str(),
            preset.min,
            preset.max,
            preset.max_guesses
        )?;
    }

    loop {
        let Some(choice) = prompt(input, out, "Difficulty [2]")? else {
            return Ok(None);
        };
        if choice.is_empty() {
            return Ok(Some(Difficulty::default()));
        }
        let picked = match choice.as_str() {
            "1" => Some(Difficulty::Easy),
            "2" => Some(Difficulty::Medium),
            "3" => Some(Difficulty::Hard),
            other => Difficulty::from_name(other),
        };
        match picked {
            Some(difficulty) => return Ok(Some(difficulty)),
            None => writeln!(out, "{}", "Pick 1, 2 or 3.".red())?,
        }
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Type a number to guess. Commands:")?;
    for (i, kind) in ClueKind::ALL.into_iter().enumerate() {
        writeln!(out, "  clue {}   {} ({} pts)", i + 1, kind.label(), kind.cost())?;
    }
    writeln!(out, "  new      start over")?;
    writeln!(out, "  quit     exit\n")
}

/// Prompt and read one trimmed line; `None` at end of input
fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    message: &str,
) -> io::Result<Option<String>> {
    write!(out, "{message}: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{
        AdvisoryDispatcher, AdvisoryProvider, Analysis, NullAdvisor, StrategyReview,
    };
    use crate::core::PresetTable;
    use crate::engine::{Engine, ManualClock};
    use crate::leaderboard::{LeaderboardStore, MemoryPersistence};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    type TestSession = Session<MemoryPersistence, StdRng, ManualClock>;

    /// Provider that is configured but never answers successfully
    struct SilentAdvisor;

    impl AdvisoryProvider for SilentAdvisor {
        fn analyze_strategy(&self, _review: &StrategyReview) -> Option<Analysis> {
            None
        }

        fn fun_fact(&self, _number: i64) -> Option<String> {
            None
        }
    }

    fn session() -> TestSession {
        Session::new(
            Engine::new(StdRng::seed_from_u64(5), ManualClock::default()),
            LeaderboardStore::open(MemoryPersistence::new()),
            PresetTable::default(),
            AdvisoryDispatcher::new(Arc::new(NullAdvisor)),
        )
    }

    fn play(session: &mut TestSession, script: &str) -> String {
        colored::control::set_override(false);
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        run_simple(session, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn correct_guess_wins_and_records_score() {
        let secret = {
            let mut peek = session();
            peek.start(Difficulty::Easy, false, "x").unwrap();
            peek.engine().round().unwrap().secret()
        };

        let mut session = session();
        let output = play(&mut session, &format!("ada\n1\nn\n{secret}\nq\n"));

        assert!(output.contains("Start Guessing!"));
        assert!(output.contains("Correct!"));
        assert!(output.contains("final score 1000"));
        assert!(output.contains("Thanks for playing!"));
        assert_eq!(session.leaderboard().len(), 1);
        assert_eq!(session.top_scores(Difficulty::Easy)[0].name(), "ada");
    }

    #[test]
    fn invalid_inputs_are_reported() {
        let mut session = session();
        let output = play(&mut session, "\nbo\nx\n1\nn\n99\nabc\nclue 9\nq\n");

        assert!(output.contains("Please enter your name!"));
        assert!(output.contains("Pick 1, 2 or 3."));
        assert!(output.contains("Range: 1 - 10"));
        assert!(output.contains("Enter a whole number."));
        assert!(output.contains("Unknown clue."));
        assert!(session.leaderboard().is_empty());
    }

    #[test]
    fn buying_a_clue_shows_text_and_cost() {
        let mut session = session();
        let output = play(&mut session, "cy\n3\nn\nclue 1\nq\n");

        assert!(output.contains("The number is"));
        assert!(output.contains("Score 950"));
    }

    #[test]
    fn smart_mode_prints_optimal_guess() {
        let mut session = session();
        let output = play(&mut session, "di\n2\ny\nq\n");
        assert!(output.contains("Optimal guess 15"));
    }

    #[test]
    fn failed_fun_fact_does_not_hold_up_the_next_prompt() {
        let secret = {
            let mut peek = session();
            peek.start(Difficulty::Easy, false, "x").unwrap();
            peek.engine().round().unwrap().secret()
        };

        let mut session = Session::new(
            Engine::new(StdRng::seed_from_u64(5), ManualClock::default()),
            LeaderboardStore::open(MemoryPersistence::new()),
            PresetTable::default(),
            AdvisoryDispatcher::new(Arc::new(SilentAdvisor)),
        );
        let started = Instant::now();
        let output = play(&mut session, &format!("ada\n1\nn\n{secret}\nq\n"));

        assert!(output.contains("Correct!"));
        assert!(output.contains("Thanks for playing!"));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(session.fun_fact_state(), &FunFactState::Unavailable);
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let mut session = session();
        let output = play(&mut session, "ed\n");
        assert!(!output.contains("Start Guessing!"));
    }
}
