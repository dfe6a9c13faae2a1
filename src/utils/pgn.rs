//! PGN read/write for game history interchange.
//!
//! Movetext is written in coordinate notation so a game can be replayed
//! exactly through the move executor; reading rebuilds every intermediate
//! position that way.

use std::collections::BTreeMap;

use chrono::Local;

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_rules::STARTING_POSITION_FEN, chess_types::*};
use crate::move_generation::move_executor::apply_move_in_place;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub initial_state: BoardState,
    pub moves: Vec<Move>,
    pub final_state: BoardState,
    pub result: String,
}

/// PGN result token for a status.
pub fn pgn_result(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Checkmate {
            winner: Color::White,
        } => "1-0",
        GameStatus::Checkmate {
            winner: Color::Black,
        } => "0-1",
        GameStatus::Stalemate => "1/2-1/2",
        GameStatus::InProgress | GameStatus::Check(_) => "*",
    }
}

/// Write `moves` (as executed from `initial_state`) with the standard seven
/// tag roster, dated today.
pub fn write_pgn(initial_state: &BoardState, moves: &[Move], status: GameStatus) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Parlor Chess Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), pgn_result(status).to_owned());

    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    write_pgn_with_headers(initial_state, moves, &headers)
}

pub fn write_pgn_with_headers(
    initial_state: &BoardState,
    moves: &[Move],
    headers: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    // Numbering follows the starting position, which may have black to move.
    let black_first = initial_state.side_to_move == Color::Black;
    let mut number = initial_state.fullmove_number;
    let mut parts = Vec::<String>::with_capacity(moves.len() + 2);

    for (ply, mv) in moves.iter().enumerate() {
        let lan = move_to_long_algebraic(mv);
        let white_to_move = (ply % 2 == 0) != black_first;
        if white_to_move {
            parts.push(format!("{number}. {lan}"));
        } else {
            if ply == 0 {
                parts.push(format!("{number}..."));
            }
            parts.push(lan);
            number = number.saturating_add(1);
        }
    }

    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    parts.push(result.to_owned());
    out.push_str(&parts.join(" "));
    out.push('\n');

    out
}

pub fn read_pgn(pgn: &str) -> Result<PgnGame, ChessErrors> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<String>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            movetext_lines.push(trimmed.to_owned());
        }
    }

    let initial_state = if headers.get("SetUp").map(|x| x.as_str()) == Some("1") {
        let fen = headers.get("FEN").ok_or_else(|| {
            ChessErrors::InvalidPgn("SetUp is 1 but the FEN header is missing".to_owned())
        })?;
        BoardState::from_fen(fen)?
    } else {
        BoardState::new_game()
    };

    let mut state = initial_state.clone();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in movetext.split_whitespace() {
        if is_move_number_token(token) {
            continue;
        }

        let cleaned = trim_annotation_suffix(token);
        if is_result_token(cleaned) {
            result = cleaned.to_owned();
            break;
        }

        let (mv, promotion) = long_algebraic_to_move(cleaned, &state)
            .map_err(|err| ChessErrors::InvalidPgn(format!("{token}: {err}")))?;
        apply_move_in_place(&mut state, &mv, promotion)
            .map_err(|err| ChessErrors::InvalidPgn(format!("{token}: {err}")))?;
    }

    if let Some(header_result) = headers.get("Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        moves: state.history.clone(),
        initial_state,
        final_state: state,
        result,
    })
}

fn parse_header_line(line: &str) -> Result<(String, String), ChessErrors> {
    let invalid = || ChessErrors::InvalidPgn(format!("invalid header line: {line}"));

    let inner = line
        .strip_prefix('[')
        .and_then(|x| x.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (key, value_raw) = inner.split_once(' ').ok_or_else(invalid)?;
    let value = value_raw
        .trim()
        .strip_prefix('"')
        .and_then(|x| x.strip_suffix('"'))
        .ok_or_else(invalid)?
        .replace("\\\"", "\"");

    Ok((key.trim().to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

fn is_move_number_token(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn trim_annotation_suffix(token: &str) -> &str {
    token.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}
