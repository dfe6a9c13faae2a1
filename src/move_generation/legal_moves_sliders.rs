//! Rook, bishop and queen candidates via ray casting.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_shared::{
    ray_targets, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};

pub fn generate_rook_moves(board: &BoardState, from: Square, rook: Piece, out: &mut Vec<Move>) {
    generate_slider_moves(board, from, rook, &ROOK_DIRECTIONS, out);
}

pub fn generate_bishop_moves(board: &BoardState, from: Square, bishop: Piece, out: &mut Vec<Move>) {
    generate_slider_moves(board, from, bishop, &BISHOP_DIRECTIONS, out);
}

pub fn generate_queen_moves(board: &BoardState, from: Square, queen: Piece, out: &mut Vec<Move>) {
    generate_slider_moves(board, from, queen, &QUEEN_DIRECTIONS, out);
}

fn generate_slider_moves(
    board: &BoardState,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    let mut targets = Vec::with_capacity(27);
    ray_targets(&board.squares, from, piece.color, directions, &mut targets);
    out.extend(
        targets
            .into_iter()
            .map(|(to, captured)| Move::new(from, to, piece, captured, MoveKind::Normal)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_in_open_center_reaches_twenty_seven_squares() {
        let board = BoardState::from_fen("k7/8/8/8/3Q4/8/8/7K w - - 0 1").expect("FEN");
        let from = Square::at(4, 3);
        let queen = board.piece_at(from).expect("queen on d4");
        let mut out = Vec::new();
        generate_queen_moves(&board, from, queen, &mut out);
        assert_eq!(out.len(), 27);
    }

    #[test]
    fn rook_capture_is_included_and_stops_the_ray() {
        let board = BoardState::from_fen("k7/8/8/8/r2R4/8/8/7K w - - 0 1").expect("FEN");
        let from = Square::at(4, 3);
        let rook = board.piece_at(from).expect("rook on d4");
        let mut out = Vec::new();
        generate_rook_moves(&board, from, rook, &mut out);

        let captures: Vec<&Move> = out.iter().filter(|mv| mv.is_capture()).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].to, Square::at(4, 0));
        assert_eq!(out.len(), 14);
    }
}
