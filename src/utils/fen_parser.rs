//! FEN-to-BoardState parser.
//!
//! Builds a fully-populated board from a Forsyth-Edwards Notation string,
//! including rights, clocks, king locations and the per-piece moved flags the
//! move generator relies on.

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::attack_generator::is_in_check;
use crate::move_generation::game_status::evaluate_status;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<BoardState, ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut board = BoardState::new_empty();

    parse_board(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_target = parse_en_passant_target(en_passant_part)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid halfmove clock: {halfmove_part}")))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid fullmove number: {fullmove_part}")))?;

    locate_kings(&mut board)?;
    validate_en_passant_target(&board)?;
    // The side that just moved may not have left its king attacked.
    let waiting = board.side_to_move.opposite();
    if is_in_check(&board, waiting) {
        return Err(invalid(&format!(
            "{} is in check but it is {} to move",
            waiting.name(),
            board.side_to_move.name()
        )));
    }
    drop_unbacked_castling_rights(&mut board);
    derive_moved_flags(&mut board);
    board.status = evaluate_status(&mut board);

    Ok(board)
}

fn invalid(msg: &str) -> ChessErrors {
    ChessErrors::InvalidFen(msg.to_owned())
}

fn parse_board(board_part: &str, board: &mut BoardState) -> Result<(), ChessErrors> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    // FEN lists rank 8 first, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                col += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;

            if col >= 8 {
                return Err(invalid("rank has too many files"));
            }

            board.squares[row][col] = Some(piece);
            col += 1;
        }

        if col != 8 {
            return Err(invalid("rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(&format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessErrors> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.grant(Color::White, CastleSide::Kingside),
            'Q' => rights.grant(Color::White, CastleSide::Queenside),
            'k' => rights.grant(Color::Black, CastleSide::Kingside),
            'q' => rights.grant(Color::Black, CastleSide::Queenside),
            _ => return Err(invalid(&format!("invalid castling rights character: {ch}"))),
        }
    }

    Ok(rights)
}

fn parse_en_passant_target(en_passant_part: &str) -> Result<Option<Square>, ChessErrors> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|e| invalid(&e.to_string()))
}

/// The target must be the empty square a double advance by the side that
/// just moved passed over, with that pawn standing one square beyond it.
fn validate_en_passant_target(board: &BoardState) -> Result<(), ChessErrors> {
    let Some(target) = board.en_passant_target else {
        return Ok(());
    };
    let mover = board.side_to_move.opposite();
    let dir = mover.pawn_direction();
    let expected_row = mover.pawn_start_row() as i16 + dir as i16;

    let pawn_square = target.offset(dir, 0);
    let origin = target.offset(-dir, 0);
    let pawn_in_place = matches!(
        pawn_square.and_then(|sq| board.piece_at(sq)),
        Some(p) if p.color == mover && p.kind == PieceKind::Pawn
    );
    let passed_over = target.row as i16 == expected_row
        && board.piece_at(target).is_none()
        && origin.is_some_and(|sq| board.piece_at(sq).is_none());

    if passed_over && pawn_in_place {
        Ok(())
    } else {
        Err(invalid(&format!(
            "en-passant square {target} does not follow a {} double pawn advance",
            mover.name()
        )))
    }
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|kind| Piece::new(kind, color))
}

fn locate_kings(board: &mut BoardState) -> Result<(), ChessErrors> {
    for color in [Color::White, Color::Black] {
        let king = Square::all().find(|sq| {
            matches!(board.piece_at(*sq), Some(p) if p.color == color && p.kind == PieceKind::King)
        });
        if let Some(square) = king {
            board.king_position[color.index()] = square;
        }
    }
    board.validate_kings()
}

/// A right is only meaningful while king and rook still stand at home.
fn drop_unbacked_castling_rights(board: &mut BoardState) {
    for color in [Color::White, Color::Black] {
        let home = color.home_row();
        let king_home = board.king_square(color) == Square::at(home, 4);
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            let rook_home = matches!(
                board.piece_at(Square::at(home, side.rook_col())),
                Some(p) if p.color == color && p.kind == PieceKind::Rook
            );
            if !king_home || !rook_home {
                board.castling_rights.revoke(color, side);
            }
        }
    }
}

fn derive_moved_flags(board: &mut BoardState) {
    for square in Square::all() {
        let Some(mut piece) = board.piece_at(square) else {
            continue;
        };
        let rights = board.castling_rights;
        piece.has_moved = match piece.kind {
            PieceKind::Pawn => square.row != piece.color.pawn_start_row(),
            PieceKind::King => {
                !rights.allows(piece.color, CastleSide::Kingside)
                    && !rights.allows(piece.color, CastleSide::Queenside)
            }
            PieceKind::Rook => {
                let home = piece.color.home_row();
                let backed = |side: CastleSide| {
                    square == Square::at(home, side.rook_col()) && rights.allows(piece.color, side)
                };
                !backed(CastleSide::Kingside) && !backed(CastleSide::Queenside)
            }
            _ => false,
        };
        board.set_piece(square, Some(piece));
    }
}
