//! TUI rendering with ratatui
//!
//! Setup, playing and end-of-round screens.

use super::app::{App, MessageStyle, SetupField};
use crate::core::{ClueKind, Difficulty};
use crate::engine::{Clock, FeedbackKind, GuessVerdict, Phase};
use crate::leaderboard::{LeaderboardEntry, LeaderboardPersistence};
use crate::output::formatters::{range_bar, verdict_marker};
use crate::session::CoachState;
use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

/// Main UI rendering function
pub fn ui<P, R, C>(f: &mut Frame, app: &App<P, R, C>)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Main content
            Constraint::Length(3), // Input area
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    if app.phase() == Phase::Setup {
        render_setup(f, app, main_chunks[0]);
        render_leaderboard(
            f,
            app.setup.difficulty,
            &app.session.top_scores(app.setup.difficulty),
            main_chunks[1],
        );
    } else {
        render_game_panel(f, app, main_chunks[0]);
        render_side_panel(f, app, main_chunks[1]);
    }

    render_input(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

fn rounded(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("🎯 GUESS THE NUMBER")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn render_setup<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(7)])
        .split(area);

    let focus_style = |field: SetupField| {
        if app.setup.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };
    let marker = |field: SetupField| if app.setup.focus == field { "▶ " } else { "  " };

    let preset = app.session.presets().get(app.setup.difficulty);
    let difficulties: Vec<Span> = Difficulty::ALL
        .into_iter()
        .flat_map(|d| {
            let style = if d == app.setup.difficulty {
                focus_style(SetupField::Difficulty).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", d.as_str()), style), Span::raw(" ")]
        })
        .collect();

    let mut difficulty_line = vec![Span::styled(
        format!("{}Difficulty: ", marker(SetupField::Difficulty)),
        focus_style(SetupField::Difficulty),
    )];
    difficulty_line.extend(difficulties);

    let content = vec![
        Line::from(vec![
            Span::styled(
                format!("{}Name:       ", marker(SetupField::Name)),
                focus_style(SetupField::Name),
            ),
            Span::styled(
                format!("{}_", app.setup.name),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(""),
        Line::from(difficulty_line),
        Line::from(Span::styled(
            format!(
                "              Range {}-{}, {} tries",
                preset.min, preset.max, preset.max_guesses
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}Smart mode: ", marker(SetupField::SmartMode)),
                focus_style(SetupField::SmartMode),
            ),
            Span::styled(
                if app.setup.smart_mode { "[x] ON" } else { "[ ] OFF" },
                Style::default().fg(if app.setup.smart_mode {
                    Color::Green
                } else {
                    Color::DarkGray
                }),
            ),
        ]),
    ];

    let form = Paragraph::new(content).block(rounded(" New Game "));
    f.render_widget(form, chunks[0]);
    render_messages(f, app, chunks[1]);
}

fn render_game_panel<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Range
            Constraint::Length(3), // Feedback
            Constraint::Length(6), // Clues
            Constraint::Min(3),    // History
        ])
        .split(area);

    render_range(f, app, chunks[0]);
    render_feedback(f, app, chunks[1]);
    render_clues(f, app, chunks[2]);
    render_history(f, app, chunks[3]);
}

fn render_range<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = app.session.engine();
    let (Some(config), Some(round)) = (engine.config(), engine.round()) else {
        return;
    };

    let remaining = round.remaining_range();
    let total = config.range_size().max(1);
    let percent = ((remaining as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as u16;

    let gauge = Gauge::default()
        .block(rounded(" Possible Range "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(percent)
        .label(format!(
            "{} - {}  ({remaining} of {total} left)",
            round.range_low(),
            round.range_high()
        ));
    f.render_widget(gauge, area);
}

fn render_feedback<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let feedback = app.session.engine().feedback();
    let color = match feedback.kind() {
        FeedbackKind::Neutral => Color::White,
        FeedbackKind::Good => Color::Green,
        FeedbackKind::Bad => Color::Red,
        FeedbackKind::Info => Color::Cyan,
    };

    let paragraph = Paragraph::new(feedback.text().to_string())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(rounded(" Feedback "));
    f.render_widget(paragraph, area);
}

fn render_clues<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = app.session.engine();
    let score = engine.round().map_or(0, |round| round.score());

    let lines: Vec<Line> = ClueKind::ALL
        .into_iter()
        .enumerate()
        .map(|(i, kind)| match engine.clue_text(kind) {
            Some(text) => Line::from(vec![
                Span::styled(format!("F{} ✓ ", i + 1), Style::default().fg(Color::Green)),
                Span::styled(text, Style::default().fg(Color::Cyan)),
            ]),
            None => {
                let affordable = score >= kind.cost();
                let style = if affordable && engine.phase() == Phase::Playing {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(Span::styled(
                    format!("F{}   {:<10} {:>3} pts", i + 1, kind.label(), kind.cost()),
                    style,
                ))
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(rounded(" Clues "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_history<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let Some(round) = app.session.engine().round() else {
        return;
    };
    let total = round.guesses().len();

    let items: Vec<ListItem> = round
        .history()
        .rev()
        .enumerate()
        .map(|(i, (guess, verdict))| {
            let color = match verdict {
                GuessVerdict::Match => Color::Green,
                GuessVerdict::TooLow => Color::Yellow,
                GuessVerdict::TooHigh => Color::Magenta,
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:>2}: ", total - i)),
                Span::styled(format!("{guess:>6} "), Style::default().fg(Color::White)),
                Span::styled(
                    format!("{} {}", verdict_marker(verdict), verdict.tag()),
                    Style::default().fg(color),
                ),
            ]))
        })
        .collect();

    let history = List::new(items).block(Block::default().title(" History ").borders(Borders::ALL));
    f.render_widget(history, area);
}

fn render_side_panel<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Round stats
            Constraint::Length(7), // Analytics or coaching
            Constraint::Min(4),    // Leaderboard
        ])
        .split(area);

    render_round_stats(f, app, chunks[0]);
    if app.phase().is_over() {
        render_coaching(f, app, chunks[1]);
    } else {
        render_analytics(f, app, chunks[1]);
    }

    if let Some(config) = app.session.engine().config() {
        render_leaderboard(
            f,
            config.difficulty(),
            &app.session.top_scores(config.difficulty()),
            chunks[2],
        );
    }
}

fn render_round_stats<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = app.session.engine();
    let (Some(config), Some(round)) = (engine.config(), engine.round()) else {
        return;
    };

    let content = vec![
        Line::from(vec![
            Span::raw("Player:  "),
            Span::styled(
                config.player_name().to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("  ({})", config.difficulty())),
        ]),
        Line::from(vec![
            Span::raw("Score:   "),
            Span::styled(
                round.score().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            "Tries:   {} of {} left",
            engine.tries_remaining(),
            config.max_guesses()
        )),
    ];

    f.render_widget(Paragraph::new(content).block(rounded(" Round ")), area);
}

fn render_analytics<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let engine = app.session.engine();
    let content = match (engine.smart_hint(), engine.config(), engine.round()) {
        (Some(hint), Some(config), Some(round)) => vec![
            Line::from(format!("Hit chance:    {:.1}%", hint.probability_percent)),
            Line::from(vec![
                Span::raw("Optimal guess: "),
                Span::styled(
                    hint.optimal_guess.to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                range_bar(
                    config.min(),
                    config.max(),
                    round.range_low(),
                    round.range_high(),
                    usize::from(area.width.saturating_sub(4)),
                ),
                Style::default().fg(Color::Cyan),
            )),
        ],
        _ => vec![Line::from(Span::styled(
            "Smart mode off",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    f.render_widget(
        Paragraph::new(content).block(rounded(" Smart Analytics ")),
        area,
    );
}

fn render_coaching<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let mut lines = Vec::new();
    if let Some(fact) = app.session.fun_fact() {
        lines.push(Line::from(Span::styled(
            format!("💡 {fact}"),
            Style::default().fg(Color::Magenta),
        )));
    }

    match app.session.coach() {
        CoachState::Ready(analysis) => {
            lines.push(Line::from(Span::styled(
                analysis.stars(),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(analysis.feedback.clone()));
        }
        CoachState::Pending => lines.push(Line::from("Coach is thinking...")),
        CoachState::Unavailable => lines.push(Line::from(Span::styled(
            "Analysis unavailable",
            Style::default().fg(Color::DarkGray),
        ))),
        CoachState::Idle if app.session.advisory_available() => {
            lines.push(Line::from("Press 'a' for a strategy review"));
        }
        CoachState::Idle => {}
    }

    let paragraph = Paragraph::new(lines)
        .block(rounded(" Coach "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_leaderboard(
    f: &mut Frame,
    difficulty: Difficulty,
    entries: &[&LeaderboardEntry],
    area: Rect,
) {
    let items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new("No scores yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == 0 {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!(
                    "{:>2}. {:<12} {:>5}",
                    i + 1,
                    entry.name(),
                    entry.score()
                ))
                .style(style)
            })
            .collect()
    };

    let title = format!(" Leaderboard: {} ", difficulty.as_str());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(list, area);
}

fn render_messages<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

fn render_input<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let (title, content, color) = match app.phase() {
        Phase::Setup => (
            " Enter: Start | Tab: Next field | ←/→: Change | Esc: Quit ",
            String::new(),
            Color::Cyan,
        ),
        Phase::Playing => (
            " Enter Guess | F1-F4: Buy clue | Esc: Abandon ",
            format!("{}_", app.guess_buffer),
            Color::Yellow,
        ),
        Phase::Won => (
            " 🎉 CORRECT! 🎉 | Enter: Play again | a: Analyze | q: Quit ",
            String::new(),
            Color::Green,
        ),
        Phase::Lost => (
            " GAME OVER | Enter: Play again | a: Analyze | q: Quit ",
            String::new(),
            Color::Red,
        ),
    };

    let input = Paragraph::new(content)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );

    f.render_widget(input, area);
}

fn render_status<P, R, C>(f: &mut Frame, app: &App<P, R, C>, area: Rect)
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let mode = Paragraph::new(format!("Phase: {}", app.phase())).alignment(Alignment::Center);
    f.render_widget(mode, chunks[0]);

    let stats = Paragraph::new(format!(
        "Games: {} | Win Rate: {:.0}%",
        app.stats.total_games,
        app.win_rate()
    ))
    .alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    let saved = Paragraph::new(format!("Saved scores: {}", app.session.leaderboard().len()))
        .alignment(Alignment::Center);
    f.render_widget(saved, chunks[2]);

    let help = Paragraph::new("Ctrl+C: Quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{AdvisoryDispatcher, NullAdvisor};
    use crate::core::PresetTable;
    use crate::engine::{Engine, ManualClock};
    use crate::leaderboard::{LeaderboardStore, MemoryPersistence};
    use crate::session::Session;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    type TestApp = App<MemoryPersistence, StdRng, ManualClock>;

    fn app() -> TestApp {
        App::new(Session::new(
            Engine::new(StdRng::seed_from_u64(21), ManualClock::default()),
            LeaderboardStore::open(MemoryPersistence::new()),
            PresetTable::default(),
            AdvisoryDispatcher::new(Arc::new(NullAdvisor)),
        ))
    }

    fn press(app: &mut TestApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &TestApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn setup_screen_shows_form_and_presets() {
        let app = app();
        let text = screen(&app);
        assert!(text.contains("New Game"));
        assert!(text.contains("Range 1-30, 7 tries"));
        assert!(text.contains("Leaderboard: MEDIUM"));
        assert!(text.contains("No scores yet"));
    }

    #[test]
    fn playing_screen_shows_range_clues_and_analytics() {
        let mut app = app();
        app.setup.name = "kim".to_string();
        app.setup.smart_mode = true;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::F(1));

        let text = screen(&app);
        assert!(text.contains("Possible Range"));
        assert!(text.contains("The number is"));
        assert!(text.contains("Optimal guess: 15"));
        assert!(text.contains("Score:   950"));
        assert!(text.contains("Phase: PLAYING"));
    }

    #[test]
    fn end_screen_lists_history_and_leaderboard() {
        let mut app = app();
        app.setup.name = "lou".to_string();
        press(&mut app, KeyCode::Enter);
        let secret = app.session.engine().round().unwrap().secret();
        let miss = if secret == 1 { 2 } else { 1 };
        for c in miss.to_string().chars().chain(['\n']) {
            press(
                &mut app,
                if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) },
            );
        }
        for c in secret.to_string().chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        let text = screen(&app);
        assert!(text.contains("Correct!"));
        assert!(text.contains("MATCH"));
        assert!(text.contains("lou"));
        assert!(text.contains("Phase: WON"));
    }
}
