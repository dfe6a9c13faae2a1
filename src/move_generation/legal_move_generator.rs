//! Full legal move generation pipeline.
//!
//! Dispatches piece-wise candidate generation, then filters out moves that
//! would leave the mover's own king attacked by simulating each one with
//! make/unmake.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::attack_generator::is_in_check;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};

/// Pseudo-legal moves of whatever piece stands on `square`.
pub fn candidate_moves(board: &BoardState, square: Square) -> Vec<Move> {
    let mut out = Vec::with_capacity(32);
    let Some(piece) = board.piece_at(square) else {
        return out;
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, square, piece, &mut out),
        PieceKind::Knight => generate_knight_moves(board, square, piece, &mut out),
        PieceKind::Bishop => generate_bishop_moves(board, square, piece, &mut out),
        PieceKind::Rook => generate_rook_moves(board, square, piece, &mut out),
        PieceKind::Queen => generate_queen_moves(board, square, piece, &mut out),
        PieceKind::King => generate_king_moves(board, square, piece, &mut out),
    }

    out
}

/// Legal moves of the piece on `square`. Empty unless that piece belongs to
/// the side to move. The board is mutated during simulation and restored
/// before returning.
pub fn valid_moves(board: &mut BoardState, square: Square) -> Vec<Move> {
    match board.piece_at(square) {
        Some(piece) if piece.color == board.side_to_move => {}
        _ => return Vec::new(),
    }

    let mut moves = candidate_moves(board, square);
    moves.retain(|mv| leaves_king_safe(board, mv));
    moves
}

/// Legal moves of the side to move, scanning squares in row-major order.
pub fn all_valid_moves(board: &mut BoardState) -> Vec<Move> {
    let color = board.side_to_move;
    let origins: Vec<Square> = board.occupied_by(color).collect();
    let mut moves = Vec::with_capacity(64);
    for square in origins {
        moves.extend(valid_moves(board, square));
    }
    moves
}

/// Whether the side to move has at least one legal move.
pub fn has_any_legal_move(board: &mut BoardState) -> bool {
    let color = board.side_to_move;
    let origins: Vec<Square> = board.occupied_by(color).collect();
    origins.into_iter().any(|square| {
        candidate_moves(board, square)
            .iter()
            .any(|mv| leaves_king_safe(board, mv))
    })
}

fn leaves_king_safe(board: &mut BoardState, mv: &Move) -> bool {
    let undo = make_move(board, mv);
    let safe = !is_in_check(board, mv.piece.color);
    unmake_move(board, undo);
    safe
}
