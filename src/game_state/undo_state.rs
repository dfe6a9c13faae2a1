use crate::game_state::chess_types::*;

/// Single undo record for `make_move` / `unmake_move`.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: Move,
    /// Piece exactly as it stood on the origin square.
    pub moved_piece: Piece,
    /// Captured piece and the square it was removed from (differs from
    /// `mv.to` for en passant).
    pub captured: Option<(Square, Piece)>,
    /// Rook as it stood before a castle relocated it.
    pub castled_rook: Option<(Square, Square, Piece)>,

    pub prev_side_to_move: Color,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_target: Option<Square>,
    pub prev_king_position: [Square; 2],
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
}
