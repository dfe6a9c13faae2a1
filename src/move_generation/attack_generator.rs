//! Raw attack sets used for check detection.
//!
//! Attacks ignore whether the attacker's own king would be exposed and never
//! include castling, so nothing here consults the legality filter.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_shared::*;

/// Squares the piece on `square` could capture on. Empty when the square is empty.
pub fn attacks(board: &BoardState, square: Square) -> Vec<Square> {
    let mut out = Vec::with_capacity(16);
    attacks_on_grid(&board.squares, square, &mut out);
    out
}

/// Grid-level attack enumeration; appends to `out`.
pub fn attacks_on_grid(grid: &Grid, square: Square, out: &mut Vec<Square>) {
    let Some(piece) = piece_on(grid, square) else {
        return;
    };

    let mut targets = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Pawn => {
            // Forward diagonals only; straight pushes never capture.
            let dir = piece.color.pawn_direction();
            for dc in [-1, 1] {
                if let Some(to) = square.offset(dir, dc) {
                    out.push(to);
                }
            }
            return;
        }
        PieceKind::Knight => step_targets(grid, square, piece.color, &KNIGHT_OFFSETS, &mut targets),
        PieceKind::King => step_targets(grid, square, piece.color, &KING_OFFSETS, &mut targets),
        PieceKind::Bishop => ray_targets(grid, square, piece.color, &BISHOP_DIRECTIONS, &mut targets),
        PieceKind::Rook => ray_targets(grid, square, piece.color, &ROOK_DIRECTIONS, &mut targets),
        PieceKind::Queen => ray_targets(grid, square, piece.color, &QUEEN_DIRECTIONS, &mut targets),
    }
    out.extend(targets.into_iter().map(|(to, _)| to));
}

/// Whether any piece of `attacker` attacks `target` on `grid`.
pub fn is_square_attacked_on(grid: &Grid, target: Square, attacker: Color) -> bool {
    let mut scratch = Vec::with_capacity(28);
    for from in Square::all() {
        match piece_on(grid, from) {
            Some(piece) if piece.color == attacker => {
                scratch.clear();
                attacks_on_grid(grid, from, &mut scratch);
                if scratch.contains(&target) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

#[inline]
pub fn is_square_attacked(board: &BoardState, target: Square, attacker: Color) -> bool {
    is_square_attacked_on(&board.squares, target, attacker)
}

/// True iff an opposing piece attacks `color`'s king.
#[inline]
pub fn is_in_check(board: &BoardState, color: Color) -> bool {
    is_square_attacked(board, board.king_square(color), color.opposite())
}
