use crate::game_state::{board_state::BoardState, chess_types::*};

pub fn generate_pawn_moves(board: &BoardState, from: Square, pawn: Piece, out: &mut Vec<Move>) {
    let color = pawn.color;
    let dir = color.pawn_direction();
    let forward_kind = |to: Square| {
        if to.row == color.promotion_row() {
            MoveKind::Promotion
        } else {
            MoveKind::Normal
        }
    };

    if let Some(one_step) = from.offset(dir, 0) {
        if board.piece_at(one_step).is_none() {
            out.push(Move::new(from, one_step, pawn, None, forward_kind(one_step)));

            if from.row == color.pawn_start_row() {
                if let Some(two_step) = one_step.offset(dir, 0) {
                    if board.piece_at(two_step).is_none() {
                        out.push(Move::new(
                            from,
                            two_step,
                            pawn,
                            None,
                            MoveKind::DoublePawnAdvance,
                        ));
                    }
                }
            }
        }
    }

    for dc in [-1i8, 1i8] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };

        match board.piece_at(to) {
            Some(target) if target.color != color => {
                out.push(Move::new(from, to, pawn, Some(target), forward_kind(to)));
            }
            Some(_) => {}
            None if board.en_passant_target == Some(to) => {
                // The pawn being captured sits beside us, on the origin row.
                let victim_square = Square::at(from.row, to.col);
                if let Some(victim) = board.piece_at(victim_square) {
                    if victim.color != color && victim.kind == PieceKind::Pawn {
                        out.push(Move::new(
                            from,
                            to,
                            pawn,
                            Some(victim),
                            MoveKind::EnPassantCapture,
                        ));
                    }
                }
            }
            None => {}
        }
    }
}
