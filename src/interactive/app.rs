//! TUI application state and logic

use crate::core::{ClueKind, Difficulty, MAX_NAME_LEN};
use crate::engine::{Clock, Phase, SystemClock};
use crate::leaderboard::LeaderboardPersistence;
use crate::session::{CoachState, Session};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::debug;

const TICK: Duration = Duration::from_millis(100);
const MAX_GUESS_LEN: usize = 12;
const MAX_MESSAGES: usize = 5;

/// Application state
pub struct App<P: LeaderboardPersistence, R: Rng = StdRng, C: Clock = SystemClock> {
    pub session: Session<P, R, C>,
    pub setup: SetupForm,
    pub guess_buffer: String,
    pub messages: Vec<Message>,
    pub stats: Statistics,
    pub should_quit: bool,
}

/// Values entered on the setup screen
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub name: String,
    pub difficulty: Difficulty,
    pub smart_mode: bool,
    pub focus: SetupField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Name,
    Difficulty,
    SmartMode,
}

impl SetupField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Difficulty,
            Self::Difficulty => Self::SmartMode,
            Self::SmartMode => Self::Name,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Name => Self::SmartMode,
            Self::Difficulty => Self::Name,
            Self::SmartMode => Self::Difficulty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

/// Rounds finished since the app started
#[derive(Debug, Default, Clone)]
pub struct Statistics {
    pub total_games: usize,
    pub games_won: usize,
}

impl<P: LeaderboardPersistence, R: Rng, C: Clock> App<P, R, C> {
    #[must_use]
    pub fn new(session: Session<P, R, C>) -> Self {
        let mut app = Self {
            session,
            setup: SetupForm {
                name: String::new(),
                difficulty: Difficulty::default(),
                smart_mode: false,
                focus: SetupField::Name,
            },
            guess_buffer: String::new(),
            messages: Vec::new(),
            stats: Statistics::default(),
            should_quit: false,
        };
        app.add_message("Enter your name, pick a difficulty, press Enter", MessageStyle::Info);
        if !app.session.advisory_available() {
            app.add_message("Coaching disabled: no API key", MessageStyle::Info);
        }
        app
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.engine().phase()
    }

    /// Route one key press to the current screen
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.phase() {
            Phase::Setup => self.handle_setup_key(key.code),
            Phase::Playing => self.handle_playing_key(key.code),
            Phase::Won | Phase::Lost => self.handle_finished_key(key.code),
        }
    }

    fn handle_setup_key(&mut self, code: KeyCode) {
        match (code, self.setup.focus) {
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Enter, _) => self.start_round(),
            (KeyCode::Tab | KeyCode::Down, focus) => self.setup.focus = focus.next(),
            (KeyCode::BackTab | KeyCode::Up, focus) => self.setup.focus = focus.previous(),
            (KeyCode::Char(c), SetupField::Name) => {
                if !c.is_control() && self.setup.name.chars().count() < MAX_NAME_LEN {
                    self.setup.name.push(c);
                }
            }
            (KeyCode::Backspace, SetupField::Name) => {
                self.setup.name.pop();
            }
            (KeyCode::Left, SetupField::Difficulty) => {
                self.setup.difficulty = self.setup.difficulty.previous();
            }
            (KeyCode::Right, SetupField::Difficulty) => {
                self.setup.difficulty = self.setup.difficulty.next();
            }
            (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), SetupField::SmartMode) => {
                self.setup.smart_mode = !self.setup.smart_mode;
            }
            _ => {}
        }
    }

    fn handle_playing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.session.reset();
                self.guess_buffer.clear();
                self.add_message("Round abandoned", MessageStyle::Info);
            }
            KeyCode::Char(c)
                if (c.is_ascii_digit() || (c == '-' && self.guess_buffer.is_empty()))
                    && self.guess_buffer.len() < MAX_GUESS_LEN =>
            {
                self.guess_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.guess_buffer.pop();
            }
            KeyCode::Enter => self.submit_guess(),
            KeyCode::F(n @ 1..=4) => self.buy_clue(ClueKind::ALL[usize::from(n - 1)]),
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char('n') => {
                self.session.reset();
                self.setup.focus = SetupField::Difficulty;
            }
            KeyCode::Char('a') => self.request_coach(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    pub fn start_round(&mut self) {
        let name = self.setup.name.clone();
        match self
            .session
            .start(self.setup.difficulty, self.setup.smart_mode, &name)
        {
            Ok(_) => {
                self.guess_buffer.clear();
                self.messages.clear();
            }
            Err(e) => self.add_message(&e.to_string(), MessageStyle::Error),
        }
    }

    pub fn submit_guess(&mut self) {
        let input = std::mem::take(&mut self.guess_buffer);
        if input.is_empty() {
            return;
        }
        let Ok(value) = input.parse::<i64>() else {
            self.add_message("Enter a whole number", MessageStyle::Error);
            return;
        };

        match self.session.guess(value) {
            Ok(outcome) => {
                debug!(value, feedback = %outcome.feedback, "Guess submitted");
                let phase = self.phase();
                if phase.is_over() {
                    self.stats.total_games += 1;
                    if phase == Phase::Won {
                        self.stats.games_won += 1;
                    }
                }
            }
            Err(e) => self.add_message(&e.to_string(), MessageStyle::Error),
        }
    }

    pub fn buy_clue(&mut self, kind: ClueKind) {
        if let Err(e) = self.session.buy_clue(kind) {
            self.add_message(&e.to_string(), MessageStyle::Error);
        }
    }

    pub fn request_coach(&mut self) {
        match self.session.request_coach() {
            CoachState::Pending => self.add_message("Coach is thinking...", MessageStyle::Info),
            CoachState::Unavailable => {
                self.add_message("Analysis unavailable", MessageStyle::Error);
            }
            CoachState::Idle | CoachState::Ready(_) => {}
        }
    }

    /// Pick up finished background work
    pub fn tick(&mut self) -> bool {
        self.session.poll_advisory()
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.stats.total_games > 0 {
            self.stats.games_won as f64 / self.stats.total_games as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui<P, R, C>(app: App<P, R, C>) -> Result<()>
where
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B, P, R, C>(terminal: &mut Terminal<B>, mut app: App<P, R, C>) -> Result<()>
where
    B: ratatui::backend::Backend,
    P: LeaderboardPersistence,
    R: Rng,
    C: Clock,
{
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        // Poll so background coaching results show up without a key press
        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
