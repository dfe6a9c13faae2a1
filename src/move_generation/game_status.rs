//! Check / checkmate / stalemate classification for the side to move.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::attack_generator::is_in_check;
use crate::move_generation::legal_move_generator::has_any_legal_move;

/// Classify the position for `board.side_to_move`. The board is restored
/// before returning.
pub fn evaluate_status(board: &mut BoardState) -> GameStatus {
    let side = board.side_to_move;
    let in_check = is_in_check(board, side);

    if !has_any_legal_move(board) {
        if in_check {
            GameStatus::Checkmate {
                winner: side.opposite(),
            }
        } else {
            GameStatus::Stalemate
        }
    } else if in_check {
        GameStatus::Check(side)
    } else {
        GameStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::evaluate_status;
    use crate::game_state::{board_state::BoardState, chess_types::*};

    fn status_of(fen: &str) -> GameStatus {
        let mut board = BoardState::from_fen(fen).expect("FEN should parse");
        evaluate_status(&mut board)
    }

    #[test]
    fn start_position_is_in_progress() {
        assert_eq!(status_of(crate::game_state::chess_rules::STARTING_POSITION_FEN), GameStatus::InProgress);
    }

    #[test]
    fn back_rank_mate_is_checkmate() {
        assert_eq!(
            status_of("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"),
            GameStatus::Checkmate { winner: Color::White }
        );
    }

    #[test]
    fn cornered_king_without_moves_is_stalemate() {
        assert_eq!(status_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameStatus::Stalemate);
    }

    #[test]
    fn check_with_escape_is_check() {
        assert_eq!(
            status_of("4k3/8/8/8/8/8/8/4RK2 b - - 0 1"),
            GameStatus::Check(Color::Black)
        );
    }
}
