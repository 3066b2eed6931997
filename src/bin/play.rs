use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use twenty48_grid::{Action, Direction, GameConfig, GameSession, MoveError};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play 2048 in the terminal against the grid/tile engine"
)]
struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the session RNG seed
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Override the board size
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// Print each move's event log as JSON lines
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_toml(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    config.validate()?;

    let mut session = GameSession::new(config);
    let seeded = session.new_game();
    if cli.events {
        print_events(&seeded)?;
    }
    render(&session);
    println!("moves: w/a/s/d (or up/left/down/right), q quits");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(dir) = parse_direction(line.trim()) else {
            if matches!(line.trim(), "q" | "quit") {
                break;
            }
            println!("unrecognized input: {}", line.trim());
            continue;
        };

        match session.try_move(dir) {
            Ok(events) if events.is_empty() => {
                println!("(nothing moves that way)");
            }
            Ok(events) => {
                if cli.events {
                    print_events(&events)?;
                }
                // Terminal rendering is instant; acknowledge right away.
                session.finish_animation();
                render(&session);
                if session.is_game_over() {
                    println!("game over");
                    break;
                }
            }
            Err(MoveError::Busy) => {
                println!("still animating the previous move");
            }
        }
    }

    info!(
        "session ended: score {}, highest tile {}",
        session.score(),
        session.highest_tile()
    );
    Ok(())
}

fn parse_direction(input: &str) -> Option<Direction> {
    match input {
        "w" | "up" => Some(Direction::Up),
        "a" | "left" => Some(Direction::Left),
        "s" | "down" => Some(Direction::Down),
        "d" | "right" => Some(Direction::Right),
        _ => None,
    }
}

fn print_events(events: &[Action]) -> Result<()> {
    let mut out = io::stdout().lock();
    for event in events {
        serde_json::to_writer(&mut out, event)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn render(session: &GameSession) {
    println!("{}", session.board());
    println!("score: {}", session.score());
}
