mod display;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotto_db::history::{append_draw, last_round, load_history};
use lotto_db::models::{Draw, PICK_COUNT, validate_numbers};
use lotto_predict::config::{GeneratorConfig, RoundConfig, RoundMode, DEFAULT_GAME_COUNT, DEFAULT_WINDOW};
use lotto_predict::generator::generate_games;
use lotto_predict::model::load_model;
use lotto_predict::round::RoundCalculator;
use crate::display::{display_draws, display_games};

#[derive(Parser)]
#[command(name = "lotto", about = "Lotto 6/45 history and game generator")]
struct Cli {
    /// History file, one draw per line
    #[arg(short, long, global = true, default_value = "lotto_numbers.txt")]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the latest draws
    History {
        /// Number of draws to show
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Append a draw to the history file
    Add,

    /// Generate games with a model artifact
    Generate {
        /// Model artifact (JSON)
        #[arg(short, long, default_value = "lotto_model.json")]
        model: PathBuf,

        /// Number of games
        #[arg(short, long, default_value_t = DEFAULT_GAME_COUNT)]
        count: usize,

        /// Draws fed to the model
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Seed for the duplicate backfill
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the current draw round
    Round {
        #[arg(long, default_value = "data")]
        mode: RoundMode,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::History { last } => cmd_history(&cli.file, last),
        Command::Add => cmd_add(&cli.file),
        Command::Generate {
            model,
            count,
            window,
            seed,
        } => cmd_generate(&cli.file, &model, count, window, seed),
        Command::Round { mode } => cmd_round(&cli.file, mode),
    }
}

fn cmd_history(file: &Path, last: usize) -> Result<()> {
    let draws = load_history(file)?;
    if draws.is_empty() {
        println!("History is empty. Add draws with: lotto add");
        return Ok(());
    }
    let start = draws.len().saturating_sub(last);
    display_draws(&draws[start..]);
    println!("{} draws in {}", draws.len(), file.display());
    Ok(())
}

fn cmd_generate(file: &Path, model_path: &Path, count: usize, window: usize, seed: Option<u64>) -> Result<()> {
    let draws = load_history(file)?;
    let model = load_model(model_path)?;
    let config = GeneratorConfig { window, count, seed };

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let games = generate_games(&draws, &model, &config, &mut rng)?;

    let round = RoundCalculator::default().current_round_now(last_round(&draws));
    display_games(&games, round);
    Ok(())
}

fn cmd_round(file: &Path, mode: RoundMode) -> Result<()> {
    let last = match load_history(file) {
        Ok(draws) => last_round(&draws),
        Err(e) if mode == RoundMode::Fixed => {
            log::debug!("{e:#}");
            None
        }
        Err(e) => return Err(e),
    };
    let calc = RoundCalculator::new(RoundConfig {
        mode,
        ..RoundConfig::default()
    });
    println!("{}", calc.current_round_now(last));
    Ok(())
}

fn cmd_add(file: &Path) -> Result<()> {
    println!("Add a draw to {}\n", file.display());

    let existing = if file.exists() { load_history(file)? } else { Vec::new() };
    let suggested = last_round(&existing).map(|r| r + 1);

    let round_prompt = match suggested {
        Some(r) => format!("Round (empty for {}, '-' for none): ", r),
        None => "Round (empty for none): ".to_string(),
    };
    let raw_round = prompt(&round_prompt)?;
    let round = match raw_round.as_str() {
        "" => suggested,
        "-" => None,
        s => Some(s.parse::<u32>().with_context(|| format!("Invalid round '{}'", s))?),
    };

    let numbers = prompt_numbers()?;
    let draw = Draw::new(round, numbers)?;

    println!("\nDraw to append:");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirm? (y/n): ")?;
    if confirm.trim().eq_ignore_ascii_case("y") {
        append_draw(file, &draw)?;
        println!("Draw appended.");
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Read error")?;
    if read == 0 {
        bail!("Unexpected end of input");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<[u8; PICK_COUNT]> {
    loop {
        let input = prompt("6 numbers (space or comma separated, 1-45): ")?;
        let nums: Result<Vec<u8>, _> = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u8>())
            .collect();
        match nums {
            Ok(v) if v.len() == PICK_COUNT => {
                let arr = [v[0], v[1], v[2], v[3], v[4], v[5]];
                if validate_numbers(&arr).is_ok() {
                    return Ok(arr);
                }
                println!("Invalid numbers (1-45, no duplicates). Try again.");
            }
            _ => println!("Enter exactly 6 numbers. Try again."),
        }
    }
}
