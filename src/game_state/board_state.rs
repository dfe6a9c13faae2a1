//! Core board state representation.
//!
//! `BoardState` is the central model of the engine: the piece grid, side to
//! move, castling rights, en-passant target, king locations, clocks, executed
//! move history and the last computed status. It is mutated only through
//! `legal_move_apply` (reversible simulation) and `move_executor` (committed
//! moves).

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub squares: Grid,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    /// Indexed by `Color::index()`.
    pub king_position: [Square; 2],

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    /// Executed moves in order, oldest first.
    pub history: Vec<Move>,
    pub status: GameStatus,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            king_position: [
                Square::at(Color::White.home_row(), 4),
                Square::at(Color::Black.home_row(), 4),
            ],
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
            status: GameStatus::InProgress,
        }
    }
}

impl BoardState {
    /// Empty board with no castling rights; callers place pieces themselves.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard initial position, white to move.
    pub fn new_game() -> Self {
        let mut board = Self::new_empty();
        for color in [Color::White, Color::Black] {
            let home = color.home_row();
            let pawns = color.pawn_start_row();
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.squares[home as usize][col] = Some(Piece::new(*kind, color));
                board.squares[pawns as usize][col] = Some(Piece::new(PieceKind::Pawn, color));
            }
            board.king_position[color.index()] = Square::at(home, 4);
        }
        board.castling_rights = CastlingRights::ALL;
        board
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    /// Remove and return whatever stands on `square`.
    #[inline]
    pub fn take_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize].take()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_position[color.index()]
    }

    /// Squares holding a piece of `color`, in row-major order.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |sq| matches!(self.piece_at(*sq), Some(p) if p.color == color))
    }

    /// Verify that exactly one king of each color exists and that
    /// `king_position` points at it.
    pub fn validate_kings(&self) -> Result<(), ChessErrors> {
        for color in [Color::White, Color::Black] {
            let kings: Vec<Square> = Square::all()
                .filter(|sq| {
                    matches!(self.piece_at(*sq), Some(p) if p.color == color && p.kind == PieceKind::King)
                })
                .collect();
            if kings.len() != 1 {
                return Err(ChessErrors::InvalidFen(format!(
                    "expected exactly one {} king, found {}",
                    color.name(),
                    kings.len()
                )));
            }
            if kings[0] != self.king_square(color) {
                return Err(ChessErrors::InvalidFen(format!(
                    "{} king position is out of sync",
                    color.name()
                )));
            }
        }
        Ok(())
    }
}
