//! Display notation for the move list.
//!
//! Short, human-oriented text: figurine glyph, capture marker and destination.
//! It carries no disambiguation or check suffix and is never parsed back; use
//! `long_algebraic` for anything that must round-trip.

use crate::game_state::chess_types::*;

/// Render `mv` for display. `mv.captured` must reflect the board the move was
/// generated on.
pub fn encode_move(mv: &Move) -> String {
    match mv.kind {
        MoveKind::CastleKingside => return "O-O".to_owned(),
        MoveKind::CastleQueenside => return "O-O-O".to_owned(),
        _ => {}
    }

    let en_passant = mv.kind == MoveKind::EnPassantCapture;
    let is_pawn = mv.piece.kind == PieceKind::Pawn;
    let mut out = String::with_capacity(12);

    if !is_pawn {
        out.push(mv.piece.glyph());
    }
    if mv.is_capture() || en_passant {
        if is_pawn {
            out.push(mv.from.file_char());
        }
        out.push('x');
    }
    out.push_str(&mv.to.to_string());
    if en_passant {
        out.push_str(" e.p.");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::encode_move;
    use crate::game_state::chess_types::*;

    fn piece(kind: PieceKind, color: Color) -> Piece {
        Piece::new(kind, color)
    }

    #[test]
    fn quiet_pawn_move_is_just_the_destination() {
        let mv = Move::new(
            Square::at(6, 4),
            Square::at(4, 4),
            piece(PieceKind::Pawn, Color::White),
            None,
            MoveKind::DoublePawnAdvance,
        );
        assert_eq!(encode_move(&mv), "e4");
    }

    #[test]
    fn piece_capture_uses_glyph_and_marker() {
        let mv = Move::new(
            Square::at(7, 6),
            Square::at(5, 5),
            piece(PieceKind::Knight, Color::White),
            Some(piece(PieceKind::Pawn, Color::Black)),
            MoveKind::Normal,
        );
        assert_eq!(encode_move(&mv), "♘xf3");

        let black_queen = Move::new(
            Square::at(0, 3),
            Square::at(4, 7),
            piece(PieceKind::Queen, Color::Black),
            None,
            MoveKind::Normal,
        );
        assert_eq!(encode_move(&black_queen), "♛h4");
    }

    #[test]
    fn pawn_capture_names_origin_file() {
        let mv = Move::new(
            Square::at(4, 4),
            Square::at(3, 3),
            piece(PieceKind::Pawn, Color::White),
            Some(piece(PieceKind::Knight, Color::Black)),
            MoveKind::Normal,
        );
        assert_eq!(encode_move(&mv), "exd5");
    }

    #[test]
    fn en_passant_gets_suffix() {
        let mv = Move::new(
            Square::at(3, 4),
            Square::at(2, 3),
            piece(PieceKind::Pawn, Color::White),
            Some(piece(PieceKind::Pawn, Color::Black)),
            MoveKind::EnPassantCapture,
        );
        assert_eq!(encode_move(&mv), "exd6 e.p.");
    }

    #[test]
    fn castles_and_promotions() {
        let king = piece(PieceKind::King, Color::Black);
        let short = Move::new(Square::at(0, 4), Square::at(0, 6), king, None, MoveKind::CastleKingside);
        let long = Move::new(Square::at(0, 4), Square::at(0, 2), king, None, MoveKind::CastleQueenside);
        assert_eq!(encode_move(&short), "O-O");
        assert_eq!(encode_move(&long), "O-O-O");

        let promo = Move::new(
            Square::at(1, 0),
            Square::at(0, 0),
            piece(PieceKind::Pawn, Color::White),
            None,
            MoveKind::Promotion,
        )
        .with_promotion(PieceKind::Queen);
        assert_eq!(encode_move(&promo), "a8");
    }
}
