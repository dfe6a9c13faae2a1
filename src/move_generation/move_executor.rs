//! Committed move application.
//!
//! Validates a requested move against the legal move list of its origin,
//! resolves the promotion choice, mutates the board, records history and
//! re-evaluates the game status for the new side to move. On any error the
//! board is left untouched.

use log::{debug, info};

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::game_status::evaluate_status;
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::legal_move_generator::valid_moves;
use crate::utils::notation::encode_move;

/// Apply `mv` to a copy of `board`, returning the new board and its status.
pub fn apply_move(
    board: &BoardState,
    mv: &Move,
    promotion: Option<PieceKind>,
) -> Result<(BoardState, GameStatus), ChessErrors> {
    let mut next = board.clone();
    let status = apply_move_in_place(&mut next, mv, promotion)?;
    Ok((next, status))
}

/// Apply `mv` directly to `board`.
pub fn apply_move_in_place(
    board: &mut BoardState,
    mv: &Move,
    promotion: Option<PieceKind>,
) -> Result<GameStatus, ChessErrors> {
    execute_move(board, mv, promotion).map(|_| board.status)
}

/// Apply `mv` to `board` and return the move as executed, with its
/// promotion choice filled in.
pub fn execute_move(
    board: &mut BoardState,
    mv: &Move,
    promotion: Option<PieceKind>,
) -> Result<Move, ChessErrors> {
    let executed = resolve_move(board, mv, promotion)?;

    make_move(board, &executed);
    board.history.push(executed);
    board.status = evaluate_status(board);

    debug!(
        "applied {} ({} -> {}), status {:?}",
        encode_move(&executed),
        executed.from,
        executed.to,
        board.status
    );
    if board.status.is_terminal() {
        info!("game over: {:?}", board.status);
    }

    Ok(executed)
}

/// The legal move on `board` with the same origin, destination and kind as
/// `mv`. Fails once the game is over.
pub fn find_legal_move(board: &BoardState, mv: &Move) -> Result<Move, ChessErrors> {
    if board.status.is_terminal() {
        return Err(ChessErrors::IllegalMove(format!(
            "game is already over ({:?})",
            board.status
        )));
    }

    let mut scratch = board.clone();
    valid_moves(&mut scratch, mv.from)
        .into_iter()
        .find(|candidate| candidate.same_action(mv))
        .ok_or_else(|| ChessErrors::IllegalMove(format!("{}{} is not a legal move", mv.from, mv.to)))
}

/// Find the legal move matching `mv` and attach the promotion choice.
pub fn resolve_move(
    board: &BoardState,
    mv: &Move,
    promotion: Option<PieceKind>,
) -> Result<Move, ChessErrors> {
    let legal = find_legal_move(board, mv)?;
    if legal.kind != MoveKind::Promotion {
        return Ok(legal);
    }

    // An explicit argument wins over a choice already carried by the move.
    match promotion.or(mv.promotion) {
        Some(choice) if choice.is_promotion_choice() => Ok(legal.with_promotion(choice)),
        other => Err(ChessErrors::InvalidPromotionChoice(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::attack_generator::is_in_check;
    use crate::move_generation::legal_move_generator::valid_moves;

    fn find(board: &BoardState, from: (u8, u8), to: (u8, u8)) -> Move {
        let mut scratch = board.clone();
        valid_moves(&mut scratch, Square::at(from.0, from.1))
            .into_iter()
            .find(|mv| mv.to == Square::at(to.0, to.1))
            .expect("move should be legal")
    }

    #[test]
    fn scholars_mate_ends_in_checkmate() {
        let mut board = BoardState::new_game();
        let line = [
            ((6, 4), (4, 4)), // e4
            ((1, 4), (3, 4)), // e5
            ((7, 5), (4, 2)), // Bc4
            ((0, 1), (2, 2)), // Nc6
            ((7, 3), (3, 7)), // Qh5
            ((0, 6), (2, 5)), // Nf6
            ((3, 7), (1, 5)), // Qxf7#
        ];
        let mut status = GameStatus::InProgress;
        for (from, to) in line {
            let mv = find(&board, from, to);
            status = apply_move_in_place(&mut board, &mv, None).expect("scripted move");
        }

        assert_eq!(status, GameStatus::Checkmate { winner: Color::White });
        assert!(is_in_check(&board, Color::Black));
        assert!(board
            .occupied_by(Color::Black)
            .collect::<Vec<_>>()
            .into_iter()
            .all(|sq| valid_moves(&mut board, sq).is_empty()));
        assert_eq!(board.history.len(), 7);
    }

    #[test]
    fn moves_after_checkmate_are_rejected() {
        let board =
            BoardState::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN");
        let pawn = board.piece_at(Square::at(1, 7)).expect("h7 pawn");
        let mv = Move::new(Square::at(1, 7), Square::at(2, 7), pawn, None, MoveKind::Normal);
        assert!(matches!(
            apply_move(&board, &mv, None),
            Err(ChessErrors::IllegalMove(_))
        ));
    }

    #[test]
    fn illegal_move_leaves_board_unchanged() {
        let mut board = BoardState::new_game();
        let before = board.clone();
        let pawn = board.piece_at(Square::at(6, 4)).expect("e2 pawn");
        let mv = Move::new(Square::at(6, 4), Square::at(3, 4), pawn, None, MoveKind::Normal);
        assert!(matches!(
            apply_move_in_place(&mut board, &mv, None),
            Err(ChessErrors::IllegalMove(_))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_removes_the_bypassing_pawn() {
        let board = BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN");
        let mv = find(&board, (3, 4), (2, 3));
        assert_eq!(mv.kind, MoveKind::EnPassantCapture);
        let (next, _) = apply_move(&board, &mv, None).expect("en passant");
        assert!(next.piece_at(Square::at(3, 3)).is_none());
        assert_eq!(
            next.piece_at(Square::at(2, 3)).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
        assert_eq!(next.en_passant_target, None);
    }

    #[test]
    fn double_advance_sets_target_on_intervening_square() {
        let board = BoardState::new_game();
        let mv = find(&board, (6, 4), (4, 4));
        let (next, status) = apply_move(&board, &mv, None).expect("e4");
        assert_eq!(next.en_passant_target, Some(Square::at(5, 4)));
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(status, GameStatus::InProgress);
    }

    #[test]
    fn promotion_requires_a_valid_choice() {
        let board = BoardState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN");
        let mv = find(&board, (1, 0), (0, 0));

        assert_eq!(
            apply_move(&board, &mv, None).err(),
            Some(ChessErrors::InvalidPromotionChoice(None))
        );
        assert_eq!(
            apply_move(&board, &mv, Some(PieceKind::King)).err(),
            Some(ChessErrors::InvalidPromotionChoice(Some(PieceKind::King)))
        );

        let (next, status) = apply_move(&board, &mv, Some(PieceKind::Rook)).expect("a8=R");
        let promoted = next.piece_at(Square::at(0, 0)).expect("promoted piece");
        assert_eq!(promoted.kind, PieceKind::Rook);
        assert_eq!(next.history[0].promotion, Some(PieceKind::Rook));
        assert_eq!(status, GameStatus::Check(Color::Black));
    }

    #[test]
    fn castling_through_executor_updates_rights_and_rook() {
        let board = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").expect("FEN");
        let mv = find(&board, (0, 4), (0, 2));
        assert_eq!(mv.kind, MoveKind::CastleQueenside);
        let (next, _) = apply_move(&board, &mv, None).expect("O-O-O");
        assert_eq!(next.piece_at(Square::at(0, 3)).map(|p| p.kind), Some(PieceKind::Rook));
        assert_eq!(next.king_square(Color::Black), Square::at(0, 2));
        assert!(!next.castling_rights.allows(Color::Black, CastleSide::Kingside));
        assert!(next.castling_rights.allows(Color::White, CastleSide::Kingside));
    }
}
