//! Pluggable board evaluation interfaces and the baseline material scorer.
//!
//! Search delegates static position scoring to `BoardScorer`, so alternate
//! heuristics can be swapped in without touching the search itself.

use rand::{Rng, RngCore};

use crate::game_state::{board_state::BoardState, chess_types::*};

/// Squares that earn the occupation bonus: d5, e5, d4, e4.
pub const CENTER_SQUARES: [Square; 4] = [
    Square::at(3, 3),
    Square::at(3, 4),
    Square::at(4, 3),
    Square::at(4, 4),
];

pub const CENTER_BONUS: f64 = 0.3;

pub trait BoardScorer: Send + Sync {
    /// Score from `perspective`'s point of view; higher is better for it.
    /// `rng` feeds any leaf noise the scorer adds.
    fn score(&self, board: &BoardState, perspective: Color, rng: &mut dyn RngCore) -> f64;
}

/// Material plus centre occupation plus uniform noise of half-width `jitter`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialScorer {
    pub jitter: f64,
}

impl MaterialScorer {
    pub const fn new(jitter: f64) -> Self {
        Self { jitter }
    }

    #[inline]
    pub const fn piece_value(piece: PieceKind) -> f64 {
        match piece {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.0,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 100.0,
        }
    }

    /// Noise-free part of the score.
    pub fn static_score(board: &BoardState, perspective: Color) -> f64 {
        let signed = |piece: Piece, value: f64| {
            if piece.color == perspective {
                value
            } else {
                -value
            }
        };

        let material: f64 = board
            .squares
            .iter()
            .flatten()
            .flatten()
            .map(|piece| signed(*piece, Self::piece_value(piece.kind)))
            .sum();

        let center: f64 = CENTER_SQUARES
            .iter()
            .filter_map(|sq| board.piece_at(*sq))
            .map(|piece| signed(piece, CENTER_BONUS))
            .sum();

        material + center
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &BoardState, perspective: Color, rng: &mut dyn RngCore) -> f64 {
        let mut score = Self::static_score(board, perspective);
        if self.jitter > 0.0 {
            score += (rng.random::<f64>() - 0.5) * 2.0 * self.jitter;
        }
        score
    }
}
