//! Reversible in-place move application.
//!
//! `make_move` performs the full board mutation for any move kind without
//! checking legality and returns an `UndoState`; `unmake_move` restores the
//! board exactly. Neither touches `history` or `status`: committing a move is
//! the executor's job.

use crate::game_state::{board_state::BoardState, chess_types::*, undo_state::UndoState};

pub fn make_move(board: &mut BoardState, mv: &Move) -> UndoState {
    let color = mv.piece.color;
    let moved_piece = board.piece_at(mv.from).unwrap_or(mv.piece);

    let mut undo = UndoState {
        mv: *mv,
        moved_piece,
        captured: None,
        castled_rook: None,
        prev_side_to_move: board.side_to_move,
        prev_castling_rights: board.castling_rights,
        prev_en_passant_target: board.en_passant_target,
        prev_king_position: board.king_position,
        prev_halfmove_clock: board.halfmove_clock,
        prev_fullmove_number: board.fullmove_number,
    };

    board.set_piece(mv.from, None);

    // Captures.
    let capture_square = match mv.kind {
        MoveKind::EnPassantCapture => Square::at(mv.from.row, mv.to.col),
        _ => mv.to,
    };
    if let Some(captured) = board.take_piece(capture_square) {
        undo.captured = Some((capture_square, captured));
    }

    // Place the moved (or promoted) piece.
    let mut placed = moved_piece;
    placed.has_moved = true;
    if mv.kind == MoveKind::Promotion {
        if let Some(choice) = mv.promotion {
            placed.kind = choice;
        }
    }
    board.set_piece(mv.to, Some(placed));

    // Castling rook relocation.
    if let Some(side) = mv.kind.castle_side() {
        let home = color.home_row();
        let rook_from = Square::at(home, side.rook_col());
        let rook_to = Square::at(home, side.rook_target_col());
        if let Some(rook) = board.take_piece(rook_from) {
            let mut relocated = rook;
            relocated.has_moved = true;
            board.set_piece(rook_to, Some(relocated));
            undo.castled_rook = Some((rook_from, rook_to, rook));
        }
    }

    if moved_piece.kind == PieceKind::King {
        board.king_position[color.index()] = mv.to;
    }

    update_castling_rights(board, mv, moved_piece, undo.captured);

    board.en_passant_target = if mv.kind == MoveKind::DoublePawnAdvance {
        Some(Square::at((mv.from.row + mv.to.row) / 2, mv.from.col))
    } else {
        None
    };

    if moved_piece.kind == PieceKind::Pawn || undo.captured.is_some() {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = board.halfmove_clock.saturating_add(1);
    }
    if color == Color::Black {
        board.fullmove_number = board.fullmove_number.saturating_add(1);
    }

    board.side_to_move = color.opposite();

    undo
}

pub fn unmake_move(board: &mut BoardState, undo: UndoState) {
    let mv = undo.mv;

    if let Some((rook_from, rook_to, rook)) = undo.castled_rook {
        board.set_piece(rook_to, None);
        board.set_piece(rook_from, Some(rook));
    }

    board.set_piece(mv.to, None);
    if let Some((square, captured)) = undo.captured {
        board.set_piece(square, Some(captured));
    }
    board.set_piece(mv.from, Some(undo.moved_piece));

    board.side_to_move = undo.prev_side_to_move;
    board.castling_rights = undo.prev_castling_rights;
    board.en_passant_target = undo.prev_en_passant_target;
    board.king_position = undo.prev_king_position;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;
}

fn update_castling_rights(
    board: &mut BoardState,
    mv: &Move,
    moved_piece: Piece,
    captured: Option<(Square, Piece)>,
) {
    match moved_piece.kind {
        PieceKind::King => board.castling_rights.revoke_all(moved_piece.color),
        PieceKind::Rook => revoke_for_rook_square(board, moved_piece.color, mv.from),
        _ => {}
    }

    // Capturing a rook on its home corner removes the victim's right.
    if let Some((square, victim)) = captured {
        if victim.kind == PieceKind::Rook {
            revoke_for_rook_square(board, victim.color, square);
        }
    }
}

fn revoke_for_rook_square(board: &mut BoardState, color: Color, square: Square) {
    let home = color.home_row();
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if square == Square::at(home, side.rook_col()) {
            board.castling_rights.revoke(color, side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{make_move, unmake_move};
    use crate::game_state::{board_state::BoardState, chess_types::*};
    use crate::move_generation::legal_move_generator::all_valid_moves;

    #[test]
    fn make_then_unmake_restores_every_field() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ];
        for fen in fens {
            let mut board = BoardState::from_fen(fen).expect("FEN should parse");
            let original = board.clone();
            for mv in all_valid_moves(&mut board) {
                let mv = if mv.kind == MoveKind::Promotion {
                    mv.with_promotion(PieceKind::Queen)
                } else {
                    mv
                };
                let undo = make_move(&mut board, &mv);
                unmake_move(&mut board, undo);
                assert_eq!(board, original, "unmake mismatch after {mv:?} in {fen}");
            }
        }
    }

    #[test]
    fn castle_relocates_rook_and_clears_rights() {
        let mut board =
            BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN");
        let king = board.piece_at(Square::at(7, 4)).expect("king");
        let mv = Move::new(
            Square::at(7, 4),
            Square::at(7, 6),
            king,
            None,
            MoveKind::CastleKingside,
        );
        make_move(&mut board, &mv);

        let rook = board.piece_at(Square::at(7, 5)).expect("rook on f1");
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(board.piece_at(Square::at(7, 7)).is_none());
        assert_eq!(board.king_square(Color::White), Square::at(7, 6));
        assert!(!board.castling_rights.allows(Color::White, CastleSide::Kingside));
        assert!(!board.castling_rights.allows(Color::White, CastleSide::Queenside));
        assert!(board.castling_rights.allows(Color::Black, CastleSide::Kingside));
    }

    #[test]
    fn capturing_home_rook_revokes_victim_right() {
        let mut board =
            BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN");
        let rook = board.piece_at(Square::at(7, 0)).expect("a1 rook");
        let victim = board.piece_at(Square::at(0, 0));
        let mv = Move::new(Square::at(7, 0), Square::at(0, 0), rook, victim, MoveKind::Normal);
        make_move(&mut board, &mv);

        assert!(!board.castling_rights.allows(Color::White, CastleSide::Queenside));
        assert!(!board.castling_rights.allows(Color::Black, CastleSide::Queenside));
        assert!(board.castling_rights.allows(Color::Black, CastleSide::Kingside));
    }
}
