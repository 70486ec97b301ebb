//! Guess The Number - CLI
//!
//! Number guessing game with TUI and line modes, a leaderboard and bot
//! simulations.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use guess_number::{
    advisory::{AdvisoryDispatcher, provider_from_env},
    commands::{query_leaderboard, run_simple, run_simulation},
    core::{Difficulty, GameConfig, PresetTable},
    engine::Engine,
    leaderboard::{DEFAULT_FILE, JsonFilePersistence, LeaderboardStore},
    logging::{LogTarget, init_logging},
    output::{print_leaderboard, print_simulation_result},
    session::Session,
    solver::{Solver, Strategy, StrategyType},
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "guess_number",
    about = "Guess the secret number: buy clues, beat the clock, top the leaderboard",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Leaderboard file
    #[arg(long, global = true, env = "GTN_LEADERBOARD", default_value = DEFAULT_FILE)]
    leaderboard: PathBuf,

    /// TOML file overriding the difficulty presets
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    /// Write logs to this file (the TUI discards logs otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI mode (default)
    Play,

    /// Line-by-line mode without TUI
    Simple,

    /// Show the best scores
    Leaderboard {
        /// Only this difficulty: easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Number of entries per difficulty
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// Let a bot play many rounds and report statistics
    Simulate {
        /// Difficulty preset: easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: String,

        /// Strategy: pivot (default), random, linear
        #[arg(short, long, default_value = "pivot")]
        strategy: String,

        /// Number of rounds to play
        #[arg(short = 'n', long, default_value = "1000")]
        rounds: usize,

        /// Base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    let target = match (&cli.log_file, &command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Commands::Play) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    };
    init_logging(target)?;

    let presets = load_presets(cli.presets.as_deref())?;

    match command {
        Commands::Play => run_play_command(&cli.leaderboard, presets),
        Commands::Simple => run_simple_command(&cli.leaderboard, presets),
        Commands::Leaderboard { difficulty, top } => {
            run_leaderboard_command(&cli.leaderboard, difficulty.as_deref(), top)
        }
        Commands::Simulate {
            difficulty,
            strategy,
            rounds,
            seed,
            quiet,
        } => run_simulate_command(&presets, &difficulty, &strategy, rounds, seed, quiet),
    }
}

fn load_presets(path: Option<&Path>) -> Result<PresetTable> {
    match path {
        Some(path) => Ok(PresetTable::load(path)?),
        None => Ok(PresetTable::default()),
    }
}

fn parse_difficulty(name: &str) -> Result<Difficulty> {
    Difficulty::from_name(name)
        .ok_or_else(|| anyhow!("Unknown difficulty '{name}' (expected easy, medium or hard)"))
}

fn open_session(leaderboard: &Path, presets: PresetTable) -> Session<JsonFilePersistence> {
    info!(path = %leaderboard.display(), "Opening leaderboard");
    Session::new(
        Engine::with_system(),
        LeaderboardStore::open(JsonFilePersistence::new(leaderboard)),
        presets,
        AdvisoryDispatcher::new(provider_from_env()),
    )
}

fn run_play_command(leaderboard: &Path, presets: PresetTable) -> Result<()> {
    use guess_number::interactive::{App, run_tui};

    let app = App::new(open_session(leaderboard, presets));
    run_tui(app)
}

fn run_simple_command(leaderboard: &Path, presets: PresetTable) -> Result<()> {
    let mut session = open_session(leaderboard, presets);
    run_simple(&mut session, &mut io::stdin().lock(), &mut io::stdout())
        .context("Line mode failed")
}

fn run_leaderboard_command(leaderboard: &Path, difficulty: Option<&str>, top: usize) -> Result<()> {
    let difficulty = difficulty.map(parse_difficulty).transpose()?;
    let store = LeaderboardStore::open(JsonFilePersistence::new(leaderboard));

    let report = query_leaderboard(&store, difficulty, top);
    for (difficulty, entries) in &report.sections {
        print_leaderboard(*difficulty, entries);
    }
    println!();
    Ok(())
}

fn run_simulate_command(
    presets: &PresetTable,
    difficulty: &str,
    strategy_name: &str,
    rounds: usize,
    seed: Option<u64>,
    quiet: bool,
) -> Result<()> {
    let difficulty = parse_difficulty(difficulty)?;
    let config = GameConfig::from_preset(presets, difficulty, false, "bot")?;
    let solver = Solver::new(StrategyType::from_name(strategy_name));
    let seed = seed.unwrap_or_else(rand::random);

    println!("\n{}", "═".repeat(60));
    println!(" Guess The Number - Simulation ");
    println!("{}", "═".repeat(60));
    println!(
        "\nDifficulty: {difficulty} ({}-{}, {} tries)",
        config.min(),
        config.max(),
        config.max_guesses()
    );
    println!("Strategy:   {}", solver.strategy().name());
    println!("Rounds:     {rounds}");
    println!("Seed:       {seed}\n");

    let result = run_simulation(&solver, &config, rounds, seed, !quiet);
    print_simulation_result(&result);
    Ok(())
}
