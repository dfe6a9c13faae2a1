//! Offset tables and target enumeration shared by the attack and move
//! generators.

use crate::game_state::chess_types::*;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[inline]
pub fn piece_on(grid: &Grid, square: Square) -> Option<Piece> {
    grid[square.row as usize][square.col as usize]
}

/// Single-step targets (knight, king): in-bounds squares not holding a piece
/// of `color`. Each entry carries the enemy piece standing there, if any.
pub fn step_targets(
    grid: &Grid,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<(Square, Option<Piece>)>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match piece_on(grid, to) {
            Some(target) if target.color == color => {}
            target => out.push((to, target)),
        }
    }
}

/// Sliding targets: walk each direction until the edge, stopping before an
/// own piece and on (including) an enemy piece.
pub fn ray_targets(
    grid: &Grid,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<(Square, Option<Piece>)>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match piece_on(grid, to) {
                None => out.push((to, None)),
                Some(target) => {
                    if target.color != color {
                        out.push((to, Some(target)));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}
