//! Move-path enumeration for validating the generator against published
//! node counts.

use std::thread;

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_rules::PROMOTION_CHOICES, chess_types::*};
use crate::move_generation::attack_generator::is_in_check;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_generator::{all_valid_moves, has_any_legal_move};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Count leaf positions `depth` plies below `board`. Each promotion
/// candidate expands into its four piece choices. The board is restored
/// before returning.
pub fn perft(board: &mut BoardState, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }
    for mv in expanded_moves(board) {
        perft_recurse(board, &mv, depth, 1, &mut total);
    }
    total
}

/// Same as `perft`, with one worker thread per root move.
pub fn perft_multi_threaded(board: &BoardState, depth: u8) -> Result<PerftCounts, ChessErrors> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut root = board.clone();
    let root_moves = expanded_moves(&mut root);

    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|mv| {
                let mut local_board = board.clone();
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    perft_recurse(&mut local_board, mv, depth, 1, &mut local);
                    local
                })
            })
            .collect();

        let mut total = PerftCounts::default();
        for handle in handles {
            let local = handle.join().map_err(|_| ChessErrors::SearchWorkerPanicked)?;
            total.merge(local);
        }
        Ok(total)
    })
}

fn expanded_moves(board: &mut BoardState) -> Vec<Move> {
    let mut out = Vec::new();
    for mv in all_valid_moves(board) {
        if mv.kind == MoveKind::Promotion {
            out.extend(PROMOTION_CHOICES.iter().map(|kind| mv.with_promotion(*kind)));
        } else {
            out.push(mv);
        }
    }
    out
}

fn perft_recurse(
    board: &mut BoardState,
    mv: &Move,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    let undo = make_move(board, mv);

    if current_depth == search_depth {
        counts.nodes += 1;
        if mv.is_capture() {
            counts.captures += 1;
        }
        match mv.kind {
            MoveKind::EnPassantCapture => counts.en_passant += 1,
            MoveKind::CastleKingside | MoveKind::CastleQueenside => counts.castles += 1,
            MoveKind::Promotion => counts.promotions += 1,
            _ => {}
        }
        if is_in_check(board, board.side_to_move) {
            counts.checks += 1;
            if !has_any_legal_move(board) {
                counts.checkmates += 1;
            }
        }
    } else {
        for child in expanded_moves(board) {
            perft_recurse(board, &child, search_depth, current_depth + 1, counts);
        }
    }

    unmake_move(board, undo);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    fn nodes(fen: &str, depth: u8) -> usize {
        let mut board = BoardState::from_fen(fen).expect("FEN should parse");
        perft(&mut board, depth).nodes
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let mut board = BoardState::new_game();
        assert_eq!(
            perft(&mut board, 0),
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn starting_position_node_counts() {
        assert_eq!(nodes(STARTING_POSITION_FEN, 1), 20);
        assert_eq!(nodes(STARTING_POSITION_FEN, 2), 400);
        assert_eq!(nodes(STARTING_POSITION_FEN, 3), 8902);
    }

    #[test]
    fn starting_position_depth_three_breakdown() {
        let mut board = BoardState::new_game();
        let counts = perft(&mut board, 3);
        assert_eq!(counts.captures, 34);
        assert_eq!(counts.checks, 12);
        assert_eq!(counts.checkmates, 0);
        assert_eq!(board, BoardState::new_game());
    }

    #[test]
    fn kiwipete_node_counts() {
        assert_eq!(nodes(KIWIPETE, 1), 48);

        let mut board = BoardState::from_fen(KIWIPETE).expect("FEN");
        let counts = perft(&mut board, 2);
        assert_eq!(counts.nodes, 2039);
        assert_eq!(counts.captures, 351);
        assert_eq!(counts.en_passant, 1);
        assert_eq!(counts.castles, 91);
        assert_eq!(counts.checks, 3);
    }

    #[test]
    fn endgame_position_node_counts() {
        assert_eq!(nodes(POSITION_3, 1), 14);
        assert_eq!(nodes(POSITION_3, 2), 191);
        assert_eq!(nodes(POSITION_3, 3), 2812);
    }

    #[test]
    fn promotion_candidates_expand_to_four_choices() {
        let mut board = BoardState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN");
        let counts = perft(&mut board, 1);
        // 4 promotions plus 3 king moves.
        assert_eq!(counts.nodes, 7);
        assert_eq!(counts.promotions, 4);
    }

    #[test]
    fn multi_threaded_matches_single_threaded() {
        let board = BoardState::from_fen(KIWIPETE).expect("FEN");
        let threaded = perft_multi_threaded(&board, 2).expect("perft workers");
        let mut scratch = board.clone();
        assert_eq!(threaded, perft(&mut scratch, 2));
    }
}
