use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_shared::{step_targets, KNIGHT_OFFSETS};

pub fn generate_knight_moves(board: &BoardState, from: Square, knight: Piece, out: &mut Vec<Move>) {
    let mut targets = Vec::with_capacity(8);
    step_targets(&board.squares, from, knight.color, &KNIGHT_OFFSETS, &mut targets);
    out.extend(
        targets
            .into_iter()
            .map(|(to, captured)| Move::new(from, to, knight, captured, MoveKind::Normal)),
    );
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::{board_state::BoardState, chess_types::*};

    #[test]
    fn corner_knight_has_two_targets() {
        let board = BoardState::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN");
        let from = Square::at(7, 0);
        let knight = board.piece_at(from).expect("knight on a1");
        let mut out = Vec::new();
        generate_knight_moves(&board, from, knight, &mut out);
        assert_eq!(out.len(), 2);
    }
}
