//! Interactive text front-end and command loop.
//!
//! Reads one command per line, drives a `ChessGame`, and lets the configured
//! engine answer for the computer side. All output goes to the supplied
//! writer so the loop can be exercised from tests.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use log::warn;

use crate::chess_errors::ChessErrors;
use crate::engines::difficulty::EngineConfig;
use crate::engines::engine_greedy::GreedyEngine;
use crate::engines::engine_minimax::MinimaxEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::chess_game::{ChessGame, MoveOutcome, Submission};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};
use crate::utils::render_game_state::render_grid;

const HELP_TEXT: &str = "\
commands:
  board                 show the board
  moves <square>        legal moves of the piece on <square>
  move <lan> | <lan>    play a move, e.g. e2e4 or e7e8q
  promote <q|r|b|n>     finish a pending promotion
  go [depth N] [movetime MS]
                        ask the engine for a move without playing it
  play                  let the engine play for the side to move
  think                 start a background search
  stop | wait           stop / await the background search and play its move
  undo                  take back the last move (and the computer's reply)
  new                   start a new game
  fen [<fen>]           print the position, or load one
  history               list the moves played
  pgn                   print the game as PGN
  status                print the game status
  set <option> <value>  difficulty, seed, replies, depth
  computer <white|black|none>
  engine <minimax|greedy>
  quit";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineKind {
    #[default]
    Minimax,
    Greedy,
}

impl FromStr for EngineKind {
    type Err = ChessErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(EngineKind::Minimax),
            "greedy" => Ok(EngineKind::Greedy),
            other => Err(ChessErrors::InvalidConfig(format!("unknown engine '{other}'"))),
        }
    }
}

/// Parse `white`, `black` or `none`.
pub fn parse_side(text: &str) -> Result<Option<Color>, ChessErrors> {
    match text.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Some(Color::White)),
        "black" | "b" => Ok(Some(Color::Black)),
        "none" | "off" => Ok(None),
        other => Err(ChessErrors::InvalidConfig(format!(
            "unknown side '{other}' (expected white, black or none)"
        ))),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    pub config: EngineConfig,
    pub engine: EngineKind,
    /// Side played by the engine.
    pub computer: Option<Color>,
    pub fen: Option<String>,
}

pub fn run_stdio_loop(options: ConsoleOptions) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut console = match ConsoleState::new(options) {
        Ok(console) => console,
        Err(err) => return Err(io::Error::new(io::ErrorKind::InvalidInput, err)),
    };

    writeln!(stdout, "{}", render_grid(&console.game.board().squares))?;
    console.play_computer_turn(&mut stdout)?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = console.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    console.game.cancel_search();
    Ok(())
}

pub struct ConsoleState {
    game: ChessGame,
    engine: Box<dyn Engine>,
    computer: Option<Color>,
}

impl ConsoleState {
    pub fn new(options: ConsoleOptions) -> Result<Self, ChessErrors> {
        let game = match &options.fen {
            Some(fen) => ChessGame::from_fen(fen, options.config)?,
            None => ChessGame::new(options.config),
        };
        Ok(Self {
            engine: build_engine(options.engine, &options.config),
            game,
            computer: options.computer,
        })
    }

    #[inline]
    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let result = match cmd {
            "quit" | "exit" => return Ok(true),
            "help" => {
                writeln!(out, "{HELP_TEXT}")?;
                Ok(())
            }
            "board" => {
                writeln!(out, "{}", render_grid(&self.game.board().squares))?;
                self.write_status(out)
            }
            "status" => self.write_status(out),
            "moves" => self.handle_moves(&args, out),
            "move" => match args.first() {
                Some(lan) => self.handle_move(lan, out),
                None => Ok(writeln!(out, "usage: move <lan>")?),
            },
            "promote" => self.handle_promote(&args, out),
            "go" => self.handle_go(&args, out),
            "play" => self.handle_play(out),
            "think" => match self.game.start_search() {
                Ok(()) => Ok(writeln!(out, "searching...")?),
                Err(err) => Ok(writeln!(out, "error: {err}")?),
            },
            "stop" => {
                self.game.stop_search();
                self.handle_search_result(out)
            }
            "wait" => self.handle_search_result(out),
            "undo" => self.handle_undo(out),
            "new" => match self.game.new_game() {
                Ok(()) => {
                    self.engine.new_game();
                    writeln!(out, "new game")?;
                    self.play_computer_turn(out)
                }
                Err(err) => Ok(writeln!(out, "error: {err}")?),
            },
            "fen" => self.handle_fen(&args, out),
            "history" => self.write_history(out),
            "pgn" => Ok(write!(out, "{}", self.game.to_pgn())?),
            "set" => self.handle_set(&args, out),
            "computer" => self.handle_computer(&args, out),
            "engine" => self.handle_engine(&args, out),
            _ if looks_like_lan(cmd) => self.handle_move(cmd, out),
            _ => Ok(writeln!(out, "unknown command '{cmd}' (try 'help')")?),
        };

        result.map(|()| false)
    }

    fn write_status(&self, out: &mut impl Write) -> io::Result<()> {
        let side = self.game.side_to_move().name();
        match self.game.status() {
            GameStatus::InProgress => writeln!(out, "{side} to move"),
            GameStatus::Check(color) => writeln!(out, "{} is in check", color.name()),
            GameStatus::Checkmate { winner } => writeln!(out, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => writeln!(out, "stalemate"),
        }
    }

    fn write_history(&self, out: &mut impl Write) -> io::Result<()> {
        let history = self.game.history();
        for (index, pair) in history.chunks(2).enumerate() {
            match pair {
                [white, black] => writeln!(out, "{}. {white} {black}", index + 1)?,
                [white] => writeln!(out, "{}. {white}", index + 1)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_moves(&self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let Some(text) = args.first() else {
            return writeln!(out, "usage: moves <square>");
        };
        let square = match algebraic_to_square(text) {
            Ok(square) => square,
            Err(err) => return writeln!(out, "error: {err}"),
        };
        let listed: Vec<String> = self
            .game
            .valid_moves(square)
            .iter()
            .map(move_to_long_algebraic)
            .collect();
        writeln!(out, "{}", listed.join(" "))
    }

    fn handle_move(&mut self, lan: &str, out: &mut impl Write) -> io::Result<()> {
        let (mv, promotion) = match long_algebraic_to_move(lan, self.game.board()) {
            Ok(parsed) => parsed,
            Err(err) => return writeln!(out, "error: {err}"),
        };
        let mv = match promotion {
            Some(kind) => mv.with_promotion(kind),
            None => mv,
        };

        match self.game.submit(&mv) {
            Ok(Submission::Applied(outcome)) => {
                self.write_outcome("", &outcome, out)?;
                self.play_computer_turn(out)
            }
            Ok(Submission::AwaitingPromotion(_)) => {
                writeln!(out, "promote to? (promote q|r|b|n)")
            }
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_promote(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let Some(kind) = args
            .first()
            .and_then(|text| text.chars().next())
            .and_then(PieceKind::from_letter)
        else {
            return writeln!(out, "usage: promote <q|r|b|n>");
        };

        match self.game.complete_promotion(kind) {
            Ok(outcome) => {
                self.write_outcome("", &outcome, out)?;
                self.play_computer_turn(out)
            }
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_go(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let params = parse_go_params(args);
        match self.engine.choose_move(self.game.board(), &params) {
            Ok(result) => {
                for info in &result.info_lines {
                    writeln!(out, "{info}")?;
                }
                match result.best_move {
                    Some(mv) => writeln!(out, "bestmove {}", move_to_long_algebraic(&mv)),
                    None => writeln!(out, "bestmove 0000"),
                }
            }
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_play(&mut self, out: &mut impl Write) -> io::Result<()> {
        match self.engine_move() {
            Ok(Some(outcome)) => self.write_outcome("engine plays ", &outcome, out),
            Ok(None) => writeln!(out, "no legal moves"),
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_search_result(&mut self, out: &mut impl Write) -> io::Result<()> {
        let report = match self.game.finish_search() {
            Some(Ok(report)) => report,
            Some(Err(err)) => return writeln!(out, "error: {err}"),
            None => return writeln!(out, "no search is running"),
        };

        writeln!(
            out,
            "info depth {} nodes {} time {}{}",
            report.depth,
            report.nodes,
            report.elapsed.as_millis(),
            if report.aborted { " (stopped)" } else { "" }
        )?;
        match self.game.apply(&report.best_move, report.best_move.promotion) {
            Ok(outcome) => self.write_outcome("engine plays ", &outcome, out),
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_undo(&mut self, out: &mut impl Write) -> io::Result<()> {
        match self.game.undo() {
            Ok(mv) => writeln!(out, "took back {}", move_to_long_algebraic(&mv))?,
            Err(err) => return writeln!(out, "error: {err}"),
        }
        // Take back the computer's reply too, so the human is on move again.
        if self.computer == Some(self.game.side_to_move()) {
            if let Ok(mv) = self.game.undo() {
                writeln!(out, "took back {}", move_to_long_algebraic(&mv))?;
            }
        }
        Ok(())
    }

    fn handle_fen(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        if args.is_empty() {
            return writeln!(out, "{}", self.game.board().get_fen());
        }
        match self.game.load_fen(&args.join(" ")) {
            Ok(()) => {
                self.engine.new_game();
                writeln!(out, "{}", render_grid(&self.game.board().squares))?;
                self.play_computer_turn(out)
            }
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_set(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let [name, value @ ..] = args else {
            return writeln!(out, "usage: set <option> <value>");
        };
        let value = value.join(" ");
        // The game's config drives background searches, the engine's drives
        // `go`, `play` and computer moves; both validate the same way.
        let applied = self
            .game
            .set_option(name, &value)
            .and_then(|()| self.engine.set_option(name, &value));
        match applied {
            Ok(()) => writeln!(out, "{}", self.game.config().describe()),
            Err(err) => writeln!(out, "error: {err}"),
        }
    }

    fn handle_computer(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        match args.first().map(|text| parse_side(text)) {
            Some(Ok(side)) => {
                self.computer = side;
                self.play_computer_turn(out)
            }
            Some(Err(err)) => writeln!(out, "error: {err}"),
            None => writeln!(out, "usage: computer <white|black|none>"),
        }
    }

    fn handle_engine(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        match args.first().map(|text| text.parse::<EngineKind>()) {
            Some(Ok(kind)) => {
                self.engine = build_engine(kind, self.game.config());
                writeln!(out, "engine {}", self.engine.name())
            }
            Some(Err(err)) => writeln!(out, "error: {err}"),
            None => writeln!(out, "usage: engine <minimax|greedy>"),
        }
    }

    /// Let the engine move if it owns the side to move.
    pub fn play_computer_turn(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.computer != Some(self.game.side_to_move()) || self.game.status().is_terminal() {
            return Ok(());
        }
        match self.engine_move() {
            Ok(Some(outcome)) => self.write_outcome("computer plays ", &outcome, out),
            Ok(None) => Ok(()),
            Err(err) => {
                warn!("computer move failed: {err}");
                writeln!(out, "error: {err}")
            }
        }
    }

    fn engine_move(&mut self) -> Result<Option<MoveOutcome>, ChessErrors> {
        let result = self.engine.choose_move(self.game.board(), &GoParams::default())?;
        match result.best_move {
            Some(mv) => self.game.apply(&mv, mv.promotion).map(Some),
            None => Ok(None),
        }
    }

    fn write_outcome(&self, prefix: &str, outcome: &MoveOutcome, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{prefix}{} ({})",
            outcome.notation,
            move_to_long_algebraic(&outcome.mv)
        )?;
        match outcome.status {
            GameStatus::InProgress => Ok(()),
            _ => self.write_status(out),
        }
    }
}

fn build_engine(kind: EngineKind, config: &EngineConfig) -> Box<dyn Engine> {
    match kind {
        EngineKind::Minimax => Box::new(MinimaxEngine::new(*config)),
        EngineKind::Greedy => Box::new(GreedyEngine::from_config(*config)),
    }
}

fn parse_go_params(args: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        match *token {
            "depth" => params.depth = tokens.next().and_then(|x| x.parse::<u8>().ok()),
            "movetime" => params.movetime_ms = tokens.next().and_then(|x| x.parse::<u64>().ok()),
            _ => {}
        }
    }
    params
}

fn looks_like_lan(token: &str) -> bool {
    let bytes = token.as_bytes();
    (bytes.len() == 4 || bytes.len() == 5)
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_lowercase()
        && bytes[3].is_ascii_digit()
}
