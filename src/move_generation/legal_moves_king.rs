use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::attack_generator::{is_in_check, is_square_attacked_on};
use crate::move_generation::legal_move_shared::{step_targets, KING_OFFSETS};

pub fn generate_king_moves(board: &BoardState, from: Square, king: Piece, out: &mut Vec<Move>) {
    let mut targets = Vec::with_capacity(8);
    step_targets(&board.squares, from, king.color, &KING_OFFSETS, &mut targets);
    out.extend(
        targets
            .into_iter()
            .map(|(to, captured)| Move::new(from, to, king, captured, MoveKind::Normal)),
    );

    generate_castling_moves(board, from, king, out);
}

fn generate_castling_moves(board: &BoardState, from: Square, king: Piece, out: &mut Vec<Move>) {
    let color = king.color;
    let home = color.home_row();

    if king.has_moved || from != Square::at(home, 4) {
        return;
    }

    // Cannot castle out of check.
    if is_in_check(board, color) {
        return;
    }

    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if can_castle(board, from, king, side) {
            let kind = match side {
                CastleSide::Kingside => MoveKind::CastleKingside,
                CastleSide::Queenside => MoveKind::CastleQueenside,
            };
            let to = Square::at(home, side.king_target_col());
            out.push(Move::new(from, to, king, None, kind));
        }
    }
}

fn can_castle(board: &BoardState, from: Square, king: Piece, side: CastleSide) -> bool {
    let color = king.color;
    let home = color.home_row();

    if !board.castling_rights.allows(color, side) {
        return false;
    }

    let rook_ready = matches!(
        board.piece_at(Square::at(home, side.rook_col())),
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved
    );
    if !rook_ready {
        return false;
    }

    if side
        .empty_cols()
        .iter()
        .any(|&col| board.piece_at(Square::at(home, col)).is_some())
    {
        return false;
    }

    // Stand the king on every square of its path and look for attacks there.
    side.king_path_cols().iter().all(|&col| {
        let stop = Square::at(home, col);
        let mut grid = board.squares;
        grid[from.row as usize][from.col as usize] = None;
        grid[stop.row as usize][stop.col as usize] = Some(king);
        !is_square_attacked_on(&grid, stop, color.opposite())
    })
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::{board_state::BoardState, chess_types::*};

    fn castles(fen: &str) -> Vec<MoveKind> {
        let board = BoardState::from_fen(fen).expect("FEN should parse");
        let from = board.king_square(board.side_to_move);
        let king = board.piece_at(from).expect("king");
        let mut out = Vec::new();
        generate_king_moves(&board, from, king, &mut out);
        out.into_iter()
            .map(|mv| mv.kind)
            .filter(|kind| kind.castle_side().is_some())
            .collect()
    }

    #[test]
    fn both_castles_offered_when_all_preconditions_hold() {
        let kinds = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(kinds, vec![MoveKind::CastleKingside, MoveKind::CastleQueenside]);
    }

    #[test]
    fn attacked_transit_square_removes_only_that_side() {
        // Black rook on f8 covers f1.
        let kinds = castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(kinds, vec![MoveKind::CastleQueenside]);
    }

    #[test]
    fn attacked_b_file_square_does_not_block_queenside() {
        // Only the king's path matters; b1 may be attacked.
        let kinds = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(kinds, vec![MoveKind::CastleQueenside]);
    }

    #[test]
    fn no_castling_out_of_check() {
        let kinds = castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(kinds.is_empty());
    }

    #[test]
    fn occupied_intervening_square_blocks_castle() {
        let kinds = castles("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(kinds.is_empty());
    }

    #[test]
    fn missing_rights_block_castle() {
        let kinds = castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(kinds.is_empty());
    }
}
