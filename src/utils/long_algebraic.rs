//! Coordinate (long algebraic) move notation: `e2e4`, `e1g1`, `e7e8q`.
//!
//! Used by the console, PGN movetext and history replay. Parsing is always
//! done against a board so the result is one of that board's legal moves.

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_generator::valid_moves;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: &Move) -> String {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from));
    out.push_str(&square_to_algebraic(mv.to));
    if let Some(kind) = mv.promotion {
        out.push(kind.letter());
    }
    out
}

/// Parse `text` into the matching legal move on `board` and the promotion
/// choice it names, if any. A promoting move without a suffix parses with
/// `None`; the executor rejects it until a choice is supplied.
pub fn long_algebraic_to_move(
    text: &str,
    board: &BoardState,
) -> Result<(Move, Option<PieceKind>), ChessErrors> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessErrors::InvalidAlgebraic(format!(
            "invalid coordinate move: {text}"
        )));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_letter(ch) {
            Some(kind) if kind.is_promotion_choice() => Some(kind),
            _ => {
                return Err(ChessErrors::InvalidAlgebraic(format!(
                    "invalid promotion suffix in {text}"
                )))
            }
        },
    };

    let mut scratch = board.clone();
    let mv = valid_moves(&mut scratch, from)
        .into_iter()
        .find(|mv| mv.to == to)
        .ok_or_else(|| ChessErrors::IllegalMove(format!("{text} is not legal here")))?;

    if promotion.is_some() && mv.kind != MoveKind::Promotion {
        return Err(ChessErrors::InvalidAlgebraic(format!(
            "{text} names a promotion but the move does not promote"
        )));
    }

    Ok((mv, promotion))
}
