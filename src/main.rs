use std::io;

use clap::Parser;
use log::info;

use parlor_chess::chess_errors::ChessErrors;
use parlor_chess::console::console_top::{parse_side, run_stdio_loop, ConsoleOptions, EngineKind};
use parlor_chess::engines::difficulty::{Difficulty, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a small minimax engine")]
struct Args {
    /// Engine strength: easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Seed for the engine's random tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    /// Side played by the computer: white, black or none
    #[arg(short, long, default_value = "black")]
    computer: String,

    /// Engine used for computer moves: minimax or greedy
    #[arg(long, default_value = "minimax")]
    engine: EngineKind,

    /// Start from this position instead of the initial one
    #[arg(long)]
    fen: Option<String>,

    /// Maximum replies examined per node
    #[arg(long)]
    replies: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Command-line values go through the same option parser as `set`.
fn engine_config(args: &Args) -> Result<EngineConfig, ChessErrors> {
    let mut config = EngineConfig {
        difficulty: args.difficulty,
        seed: args.seed,
        ..EngineConfig::default()
    };
    if let Some(replies) = args.replies {
        config.set_option("replies", &replies.to_string())?;
    }
    Ok(config)
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let computer = parse_side(&args.computer)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .init();

    let config = engine_config(&args)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    info!("starting console: {}", config.describe());

    run_stdio_loop(ConsoleOptions {
        config,
        engine: args.engine,
        computer,
        fen: args.fen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("parlor_chess").chain(line.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn replies_follow_option_rules() {
        let config = engine_config(&args(&["--replies", "4", "--seed", "9"])).expect("config");
        assert_eq!(config.reply_limit, 4);
        assert_eq!(config.seed, Some(9));
        assert!(matches!(
            engine_config(&args(&["--replies", "0"])),
            Err(ChessErrors::InvalidConfig(_))
        ));
    }

    #[test]
    fn difficulty_parses_from_text() {
        let config = engine_config(&args(&["-d", "hard"])).expect("config");
        assert_eq!(config.depth(), 4);
        assert!(Args::try_parse_from(["parlor_chess", "--difficulty", "expert"]).is_err());
    }
}
